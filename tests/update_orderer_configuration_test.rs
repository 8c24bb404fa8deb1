use std::time::Duration;

use log::LevelFilter;
use orderer_config::{
    orderer::{
        orderer_configuration,
        spec::{Consenter, EtcdRaft, Kafka, Orderer, OrdererType},
        update_orderer_configuration,
    },
    types::{
        config_tree::ChannelConfig,
        policies::{Policy, ADMINS_POLICY_KEY, ORDERER_ADMINS_POLICY_NAME},
        values::{
            BatchSize, ConsensusType, CONSENSUS_TYPE_KEY, KAFKA_BROKERS_KEY, ORDERER_ADDRESSES_KEY,
            ORDERER_GROUP_KEY,
        },
    },
    OrdererConfigError,
};

mod common;

use crate::common::{
    fixtures::{application_group, orderer_org, solo_channel_config, APPLICATION_GROUP_KEY},
    logging::setup_logger,
    mem_certs::MemCerts,
};

fn kafka_update() -> Orderer {
    Orderer::builder()
        .orderer_type(OrdererType::Kafka)
        // Ignored by the update.
        .policies(Default::default())
        .addresses(vec![
            "orderer0:7050".to_string(),
            "orderer1:7050".to_string(),
        ])
        .batch_size(BatchSize {
            max_message_count: 1,
            absolute_max_bytes: 2,
            preferred_max_bytes: 3,
        })
        .batch_timeout(Duration::from_secs(90))
        .kafka(Kafka {
            brokers: vec!["10.0.0.1:9092".to_string()],
        })
        // Ignored by the update.
        .organizations(vec![orderer_org("Org9", &[])])
        .max_channels(3)
        .build()
}

#[test]
fn update_overwrites_standard_values_test() {
    setup_logger(LevelFilter::Trace);

    let mut config = solo_channel_config();
    let policies_before: Vec<_> = config
        .channel_group
        .group(ORDERER_GROUP_KEY)
        .unwrap()
        .policies()
        .map(|(name, policy)| (name.clone(), policy.clone()))
        .collect();
    let org1_before = config
        .channel_group
        .group(ORDERER_GROUP_KEY)
        .unwrap()
        .group("Org1")
        .unwrap()
        .clone();

    update_orderer_configuration(&mut config, &kafka_update(), &MemCerts::new()).unwrap();

    let orderer_config = orderer_configuration(&config).unwrap();
    assert_eq!(orderer_config.orderer_type, OrdererType::Kafka);
    assert_eq!(orderer_config.batch_size.max_message_count, 1);
    assert_eq!(orderer_config.batch_size.preferred_max_bytes, 3);
    assert_eq!(orderer_config.batch_timeout, "1m30s");
    assert_eq!(orderer_config.max_channels, 3);
    assert_eq!(orderer_config.kafka_brokers, vec!["10.0.0.1:9092".to_string()]);
    assert_eq!(
        orderer_config.addresses,
        vec!["orderer0:7050".to_string(), "orderer1:7050".to_string()]
    );

    // The addresses are written at the channel scope, not inside the Orderer group.
    let addresses = config.channel_group.value(ORDERER_ADDRESSES_KEY).unwrap();
    assert_eq!(addresses.mod_policy, ORDERER_ADMINS_POLICY_NAME);
    let orderer_group = config.channel_group.group(ORDERER_GROUP_KEY).unwrap();
    assert!(orderer_group.value(ORDERER_ADDRESSES_KEY).is_none());
    assert!(orderer_group.value(KAFKA_BROKERS_KEY).is_some());

    // Policies and organizations are left untouched.
    let policies_after: Vec<_> = orderer_group
        .policies()
        .map(|(name, policy)| (name.clone(), policy.clone()))
        .collect();
    assert_eq!(policies_before, policies_after);
    assert_eq!(orderer_group.groups().count(), 1);
    assert_eq!(orderer_group.group("Org1").unwrap(), &org1_before);
    assert!(orderer_group.group("Org9").is_none());

    // Sibling groups are left untouched.
    assert_eq!(
        config.channel_group.group(APPLICATION_GROUP_KEY).unwrap(),
        &application_group()
    );
}

#[test]
fn update_without_addresses_test() {
    setup_logger(LevelFilter::Trace);

    let mut config = solo_channel_config();
    let mut orderer = kafka_update();
    orderer.addresses.clear();

    update_orderer_configuration(&mut config, &orderer, &MemCerts::new()).unwrap();

    assert!(config.channel_group.value(ORDERER_ADDRESSES_KEY).is_none());
}

#[test]
fn update_missing_orderer_group_test() {
    setup_logger(LevelFilter::Trace);

    let mut config = ChannelConfig::new();
    config
        .channel_group
        .replace_group(APPLICATION_GROUP_KEY, application_group());
    let before = config.clone();

    let err = update_orderer_configuration(&mut config, &kafka_update(), &MemCerts::new())
        .unwrap_err();

    match err {
        OrdererConfigError::MissingGroup { group } => assert_eq!(group, ORDERER_GROUP_KEY),
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(config, before);
}

#[test]
fn update_unresolvable_cert_keeps_consensus_type_test() {
    setup_logger(LevelFilter::Trace);

    let mut config = solo_channel_config();
    let consensus_before: ConsensusType = config
        .channel_group
        .group(ORDERER_GROUP_KEY)
        .unwrap()
        .value(CONSENSUS_TYPE_KEY)
        .unwrap()
        .decode()
        .unwrap();

    let orderer = Orderer::builder()
        .orderer_type(OrdererType::EtcdRaft)
        .policies(
            [(ADMINS_POLICY_KEY.to_string(), Policy::signature("OR('Org1.admin')"))]
                .into_iter()
                .collect(),
        )
        .etcd_raft(EtcdRaft {
            consenters: vec![Consenter::builder()
                .host("orderer0")
                .port(7050)
                .client_tls_cert("/missing/client.pem")
                .server_tls_cert("/missing/server.pem")
                .build()],
            options: None,
        })
        .build();

    let err = update_orderer_configuration(&mut config, &orderer, &MemCerts::new()).unwrap_err();
    assert!(matches!(
        err,
        OrdererConfigError::CertificateResolution { .. }
    ));

    let consensus_after: ConsensusType = config
        .channel_group
        .group(ORDERER_GROUP_KEY)
        .unwrap()
        .value(CONSENSUS_TYPE_KEY)
        .unwrap()
        .decode()
        .unwrap();
    assert_eq!(consensus_before, consensus_after);
}
