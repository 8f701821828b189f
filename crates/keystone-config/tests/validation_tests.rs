use keystone_config::*;

const BASE: &str = r#"
[[compilers]]
version = "0.8.3"

[paths]
sources = "contracts"
"#;

fn load(extra: &str) -> RawConfig {
    ConfigLoader::new()
        .load_str(&format!("{}\n{}", BASE, extra), ConfigFormat::Toml, "/work")
        .unwrap()
}

fn violations(extra: &str, network: &str) -> Vec<ValidationError> {
    let raw = load(extra);
    match ConfigResolver::resolve_network(&raw, network, &MapEnv::new()) {
        Ok(_) => Vec::new(),
        Err(e) => e.violations().to_vec(),
    }
}

/// Test structural errors raised at load time
#[test]
fn test_malformed_documents() {
    let loader = ConfigLoader::new();

    let cases = [
        ("[paths]\nsources = \"contracts\"", "compiler"),
        ("[[compilers]]\nversion = \"0.8.3\"", "paths.sources"),
        (
            "[[compilers]]\noptimizer = { enabled = true }\n[paths]\nsources = \"contracts\"",
            "compilers[0].version",
        ),
    ];

    for (source, expected) in cases {
        match loader.load_str(source, ConfigFormat::Toml, "/work") {
            Err(ConfigError::MalformedConfig(message)) => assert!(
                message.contains(expected),
                "'{}' does not mention {}",
                message,
                expected
            ),
            other => panic!("expected MalformedConfig, got {:?}", other),
        }
    }
}

#[test]
fn test_wrong_shape_is_rejected() {
    let loader = ConfigLoader::new();
    assert!(loader
        .load_str(
            &format!("{}\n[networks.fuji]\nchain_id = \"43113\"", BASE),
            ConfigFormat::Toml,
            "/work"
        )
        .is_err());
    assert!(loader
        .load_str(
            &format!("{}\n[networks.fuji]\nlive = true\nchainid = 43113", BASE),
            ConfigFormat::Toml,
            "/work"
        )
        .is_err());
}

/// Misspelled keys fail the load instead of dropping the setting
#[test]
fn test_misspelled_keys_are_rejected() {
    let loader = ConfigLoader::new();

    let cases = [
        // top level
        "[[compilers]]\nversion = \"0.8.3\"\n[paths]\nsources = \"contracts\"\n[netwroks.fuji]\nchain_id = 43113",
        // compiler entry
        "[[compilers]]\nversion = \"0.8.3\"\noptimiser = { enabled = true, runs = 200 }\n[paths]\nsources = \"contracts\"",
        // optimizer settings
        "[[compilers]]\nversion = \"0.8.3\"\noptimizer = { enabled = true, run = 200 }\n[paths]\nsources = \"contracts\"",
        // named account role
        "[[compilers]]\nversion = \"0.8.3\"\n[paths]\nsources = \"contracts\"\n[named_accounts.treasury]\ndefault = 2\noverides = { simulated = 1 }",
        // paths
        "[[compilers]]\nversion = \"0.8.3\"\n[paths]\nsources = \"contracts\"\nartefacts = \"build\"",
        // tooling
        "[[compilers]]\nversion = \"0.8.3\"\n[paths]\nsources = \"contracts\"\n[test]\ntimeout = 5000",
    ];

    for source in cases {
        match loader.load_str(source, ConfigFormat::Toml, "/work") {
            Err(ConfigError::Toml(_)) => {}
            other => panic!("expected a toml error for\n{}\ngot {:?}", source, other),
        }
    }

    let json = r#"{"compilers": [{"version": "0.8.3", "optimiser": {"enabled": true}}],
                   "paths": {"sources": "contracts"}}"#;
    assert!(matches!(
        loader.load_str(json, ConfigFormat::Json, "/work"),
        Err(ConfigError::Json(_))
    ));

    // The correctly spelled document keeps every setting
    let raw = loader
        .load_str(
            "[[compilers]]\nversion = \"0.8.3\"\noptimizer = { enabled = true, runs = 200 }\n[paths]\nsources = \"contracts\"\n[named_accounts.treasury]\ndefault = 2\noverrides = { simulated = 1 }",
            ConfigFormat::Toml,
            "/work",
        )
        .unwrap();
    let resolved = ConfigResolver::resolve_network(&raw, "simulated", &MapEnv::new()).unwrap();
    assert!(resolved.primary_compiler().optimizer_enabled);
    assert_eq!(resolved.lookup_account("treasury").unwrap(), 1);
}

/// Every violation is reported in one pass
#[test]
fn test_violations_are_collected() {
    let errors = violations(
        r#"
        [networks.fuji]
        live = true

        [networks.broken]
        rpc_url = "ftp://example.org"
        chain_id = 0
        gas_price = 0

        [test]
        timeout_ms = 0
        "#,
        "simulated",
    );

    assert!(errors.contains(&ValidationError::MissingRpcUrl("fuji".to_string())));
    assert!(errors.contains(&ValidationError::MissingChainId("fuji".to_string())));
    assert!(errors.contains(&ValidationError::InvalidChainId("broken".to_string())));
    assert!(errors.contains(&ValidationError::InvalidGasPrice("broken".to_string())));
    assert!(errors.contains(&ValidationError::InvalidTestTimeout));
    assert!(errors
        .iter()
        .any(|e| matches!(e, ValidationError::InvalidRpcUrl { network, .. } if network == "broken")));
}

#[test]
fn test_optimizer_settings() {
    let raw = ConfigLoader::new()
        .load_str(
            r#"
            [[compilers]]
            version = "0.8.3"
            optimizer = { enabled = false, runs = 200 }

            [paths]
            sources = "contracts"
            "#,
            ConfigFormat::Toml,
            "/work",
        )
        .unwrap();
    let resolved = ConfigResolver::resolve_network(&raw, "simulated", &MapEnv::new()).unwrap();
    assert_eq!(
        resolved.warnings(),
        &[ValidationWarning::InvalidOptimizerSettings {
            version: "0.8.3".to_string(),
            runs: 200,
        }]
    );
    assert_eq!(resolved.primary_compiler().optimizer_runs, None);

    let raw = ConfigLoader::new()
        .load_str(
            r#"
            [[compilers]]
            version = "0.8"
            [[compilers]]
            version = "0.7.6"
            optimizer = { enabled = true, runs = 0 }

            [paths]
            sources = "contracts"
            "#,
            ConfigFormat::Toml,
            "/work",
        )
        .unwrap();
    let err = ConfigResolver::resolve_network(&raw, "simulated", &MapEnv::new()).unwrap_err();
    assert_eq!(err.violations().len(), 2);
}

#[test]
fn test_role_validation() {
    let errors = violations(
        r#"
        [named_accounts]
        deployer = { default = 0, overrides = { mainnet = 1, "999" = 2 } }
        "#,
        "simulated",
    );
    assert_eq!(
        errors,
        vec![
            ValidationError::UnknownOverrideNetwork {
                role: "deployer".to_string(),
                key: "999".to_string(),
            },
            ValidationError::UnknownOverrideNetwork {
                role: "deployer".to_string(),
                key: "mainnet".to_string(),
            },
        ]
    );

    // A chain id shared by a declared network is a valid key
    assert!(violations(
        r#"
        [named_accounts]
        deployer = { default = 0, overrides = { "31337" = 1 } }
        "#,
        "simulated",
    )
    .is_empty());
}

#[test]
fn test_empty_paths_and_secret_references() {
    let raw = ConfigLoader::new()
        .load_str(
            r#"
            [[compilers]]
            version = "0.8.3"

            [paths]
            sources = "contracts"
            cache = ""

            [networks.bsc]
            rpc_url = "https://bsc-dataseed.binance.org"
            chain_id = 56
            live = true
            accounts = { kind = "private_keys", env = [""] }
            "#,
            ConfigFormat::Toml,
            "/work",
        )
        .unwrap();

    let err = ConfigResolver::resolve_network(&raw, "simulated", &MapEnv::new()).unwrap_err();
    assert!(err
        .violations()
        .contains(&ValidationError::EmptyPath(PathRole::Cache)));
    assert!(err
        .violations()
        .contains(&ValidationError::EmptySecretReference {
            network: "bsc".to_string()
        }));
}

#[test]
fn test_rpc_url_from_environment_is_validated() {
    let raw = load(
        r#"
        [networks.bsc]
        rpc_url_env = "BSC_RPC_URL"
        chain_id = 56
        live = true
        "#,
    );

    let err = ConfigResolver::resolve_network(&raw, "bsc", &MapEnv::new()).unwrap_err();
    assert_eq!(
        err.violations(),
        &[ValidationError::MissingCredential {
            network: "bsc".to_string(),
            variable: "BSC_RPC_URL".to_string(),
        }]
    );

    let env = MapEnv::new().with("BSC_RPC_URL", "bsc-dataseed.binance.org");
    let err = ConfigResolver::resolve_network(&raw, "bsc", &env).unwrap_err();
    assert!(matches!(
        err.violations(),
        [ValidationError::InvalidRpcUrl { .. }]
    ));

    let env = MapEnv::new().with("BSC_RPC_URL", "wss://bsc-ws-node.nariox.org:443");
    let resolved = ConfigResolver::resolve_network(&raw, "bsc", &env).unwrap();
    assert_eq!(
        resolved.network().rpc.as_ref().map(RpcEndpoint::url),
        Some("wss://bsc-ws-node.nariox.org:443")
    );
}

#[test]
fn test_abi_filter_overlap_warning() {
    let raw = load(
        r#"
        [abi_export]
        only = ["Token", "Vault"]
        except = ["Vault"]
        "#,
    );
    let resolved = ConfigResolver::resolve_network(&raw, "simulated", &MapEnv::new()).unwrap();
    assert_eq!(
        resolved.warnings(),
        &[ValidationWarning::AbiFilterOverlap {
            contracts: vec!["Vault".to_string()]
        }]
    );
}
