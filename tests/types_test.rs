use std::{fs, time::Duration};

use borsh::{BorshDeserialize, BorshSerialize};
use log::LevelFilter;
use orderer_config::{
    orderer::{
        metadata::{CertificateResolver, FileCertificateResolver},
        orderer_configuration,
        spec::{
            CertificateRef, ConsensusState, Consenter, EtcdRaft, Orderer, OrdererType, RaftOptions,
        },
        update_orderer_configuration,
    },
    types::{
        config_tree::{add_value, ChannelConfig, ConfigGroup},
        policies::ADMINS_POLICY_KEY,
        values::{
            duration_string, ConsensusType, BATCH_SIZE_KEY, CONSENSUS_TYPE_KEY, ORDERER_GROUP_KEY,
        },
    },
    OrdererConfigError,
};

mod common;

use crate::common::{
    fixtures::solo_channel_config,
    logging::setup_logger,
    mem_certs::MemCerts,
};

#[test]
fn duration_string_test() {
    assert_eq!(duration_string(Duration::ZERO), "0s");
    assert_eq!(duration_string(Duration::from_nanos(10)), "10ns");
    assert_eq!(duration_string(Duration::from_nanos(1_500)), "1.5µs");
    assert_eq!(duration_string(Duration::from_millis(500)), "500ms");
    assert_eq!(duration_string(Duration::from_micros(2_250)), "2.25ms");
    assert_eq!(duration_string(Duration::from_secs(2)), "2s");
    assert_eq!(duration_string(Duration::from_millis(1_500)), "1.5s");
    assert_eq!(duration_string(Duration::from_secs(90)), "1m30s");
    assert_eq!(duration_string(Duration::from_secs(120)), "2m0s");
    assert_eq!(duration_string(Duration::from_secs(3_600)), "1h0m0s");
    assert_eq!(duration_string(Duration::from_secs(3_725)), "1h2m5s");
}

#[test]
fn orderer_type_and_consensus_state_parse_test() {
    assert_eq!("solo".parse::<OrdererType>().unwrap(), OrdererType::Solo);
    assert_eq!("kafka".parse::<OrdererType>().unwrap(), OrdererType::Kafka);
    assert_eq!(
        "etcdraft".parse::<OrdererType>().unwrap(),
        OrdererType::EtcdRaft
    );
    assert_eq!(OrdererType::EtcdRaft.to_string(), "etcdraft");

    match "pbft".parse::<OrdererType>() {
        Err(OrdererConfigError::UnknownOrdererType { orderer_type }) => {
            assert_eq!(orderer_type, "pbft")
        }
        other => panic!("unexpected result: {:?}", other),
    }

    assert_eq!(
        "STATE_MAINTENANCE".parse::<ConsensusState>().unwrap(),
        ConsensusState::Maintenance
    );
    assert!(matches!(
        "STATE_PAUSED".parse::<ConsensusState>(),
        Err(OrdererConfigError::UnknownConsensusState { .. })
    ));
    assert!(matches!(
        ConsensusState::from_code(7),
        Err(OrdererConfigError::UnknownConsensusState { .. })
    ));
    assert_eq!(ConsensusState::default(), ConsensusState::Normal);
}

#[test]
fn file_certificate_resolver_test() {
    let dir = std::env::temp_dir().join(format!("orderer_config_test_{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join("server.pem");
    fs::write(&path, b"-----BEGIN CERTIFICATE-----").unwrap();

    let resolver = FileCertificateResolver;
    assert_eq!(
        resolver.resolve(&CertificateRef::new(&path)).unwrap(),
        b"-----BEGIN CERTIFICATE-----".to_vec()
    );
    assert!(resolver
        .resolve(&CertificateRef::new(dir.join("missing.pem")))
        .is_err());

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn orderer_configuration_read_back_test() {
    let config = solo_channel_config();

    let orderer_config = orderer_configuration(&config).unwrap();
    assert_eq!(orderer_config.orderer_type, OrdererType::Solo);
    assert_eq!(orderer_config.state, ConsensusState::Normal);
    assert_eq!(orderer_config.batch_timeout, "2s");
    assert!(orderer_config.consensus_metadata.is_empty());
    assert!(orderer_config.etcd_raft.is_none());
    assert!(orderer_config.capabilities.is_empty());
    assert!(orderer_config.kafka_brokers.is_empty());
    assert!(orderer_config.addresses.is_empty());
    assert_eq!(
        orderer_config.org_endpoints["Org1"],
        vec!["grpcs://org1:7050".to_string()]
    );

    assert!(matches!(
        orderer_configuration(&ChannelConfig::new()),
        Err(OrdererConfigError::MissingGroup { .. })
    ));
}

#[test]
fn orderer_configuration_unknown_stored_type_test() {
    let mut config = solo_channel_config();
    add_value(
        config
            .channel_group
            .group_mut(ORDERER_GROUP_KEY)
            .unwrap(),
        CONSENSUS_TYPE_KEY,
        &ConsensusType {
            consensus_type: "bft".to_string(),
            metadata: Vec::new(),
            state: 0,
        },
        ADMINS_POLICY_KEY,
    )
    .unwrap();

    assert!(matches!(
        orderer_configuration(&config),
        Err(OrdererConfigError::UnknownOrdererType { .. })
    ));
}

#[test]
fn orderer_configuration_missing_value_test() {
    let mut config = ChannelConfig::new();
    let mut orderer_group = ConfigGroup::new();
    add_value(
        &mut orderer_group,
        CONSENSUS_TYPE_KEY,
        &ConsensusType {
            consensus_type: "solo".to_string(),
            metadata: Vec::new(),
            state: 0,
        },
        ADMINS_POLICY_KEY,
    )
    .unwrap();
    config
        .channel_group
        .replace_group(ORDERER_GROUP_KEY, orderer_group);

    match orderer_configuration(&config) {
        Err(OrdererConfigError::MissingValue { key, .. }) => assert_eq!(key, BATCH_SIZE_KEY),
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn channel_config_borsh_round_trip_test() {
    setup_logger(LevelFilter::Trace);

    let mut certs = MemCerts::new();
    certs.insert("/certs/orderer0/client.pem", b"orderer0 client");
    certs.insert("/certs/orderer0/server.pem", b"orderer0 server");

    let raft = Orderer::builder()
        .orderer_type(OrdererType::EtcdRaft)
        .policies(Default::default())
        .addresses(vec!["orderer0:7050".to_string()])
        .etcd_raft(EtcdRaft {
            consenters: vec![Consenter::builder()
                .host("orderer0")
                .port(7050)
                .client_tls_cert("/certs/orderer0/client.pem")
                .server_tls_cert("/certs/orderer0/server.pem")
                .build()],
            options: Some(RaftOptions::default()),
        })
        .build();

    let mut config = solo_channel_config();
    config.sequence = 3;
    update_orderer_configuration(&mut config, &raft, &certs).unwrap();

    let bytes = config.try_to_vec().unwrap();
    let decoded = ChannelConfig::try_from_slice(&bytes).unwrap();
    assert_eq!(decoded, config);

    // Nested groups survive with their values intact.
    let orderer_config = orderer_configuration(&decoded).unwrap();
    assert_eq!(orderer_config.orderer_type, OrdererType::EtcdRaft);
    assert_eq!(orderer_config.addresses, vec!["orderer0:7050".to_string()]);
    assert_eq!(
        orderer_config.etcd_raft.unwrap().consenters[0].server_tls_cert,
        b"orderer0 server".to_vec()
    );
    assert_eq!(
        orderer_config.org_endpoints["Org1"],
        vec!["grpcs://org1:7050".to_string()]
    );

    // Trailing bytes are rejected.
    let mut extended = bytes;
    extended.push(0);
    assert!(ChannelConfig::try_from_slice(&extended).is_err());
}

#[test]
fn orderer_configuration_malformed_raft_metadata_test() {
    let mut config = solo_channel_config();
    add_value(
        config
            .channel_group
            .group_mut(ORDERER_GROUP_KEY)
            .unwrap(),
        CONSENSUS_TYPE_KEY,
        &ConsensusType {
            consensus_type: "etcdraft".to_string(),
            metadata: vec![0xff],
            state: 0,
        },
        ADMINS_POLICY_KEY,
    )
    .unwrap();

    match orderer_configuration(&config) {
        Err(OrdererConfigError::MalformedValue { group, key, .. }) => {
            assert_eq!(group, ORDERER_GROUP_KEY);
            assert_eq!(key, CONSENSUS_TYPE_KEY);
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

