use keystone_config::{ConfigFormat, ConfigLoader, ConfigResolver, ConfigValidator, ProcessEnv};
use std::path::PathBuf;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Keystone Configuration Basic Usage Example");
    println!("==========================================\n");

    // Example 1: Load the bundled multi-network configuration
    println!("1. Loading configuration from file:");
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("configs/avalanche.toml");
    let raw = ConfigLoader::new().load_file(&path)?;
    println!("   Root: {}", raw.root.display());
    println!(
        "   Networks: {}",
        raw.network_names().into_iter().collect::<Vec<_>>().join(", ")
    );

    // Example 2: Resolve networks against the process environment
    println!("\n2. Resolving networks:");
    for network in ["simulated", "fuji", "bsc"] {
        match ConfigResolver::resolve_network(&raw, network, &ProcessEnv) {
            Ok(resolved) => println!(
                "   {} - chain {:?}, {} warning(s)",
                network,
                resolved.network().chain_id,
                resolved.warnings().len()
            ),
            Err(e) => println!("   {} - {}", network, e),
        }
    }

    // Example 3: Named accounts and paths
    println!("\n3. Lookups on the simulated network:");
    let resolved = ConfigResolver::resolve_network(&raw, "simulated", &ProcessEnv)?;
    println!("   deployer -> {}", resolved.lookup_account("deployer")?);
    println!("   treasury -> {}", resolved.lookup_account("treasury")?);
    println!("   sources  -> {}", resolved.lookup_path("sources")?.display());

    // Example 4: Configuration report
    println!("\n4. Configuration report:");
    println!("{}", ConfigValidator::generate_report(&resolved));

    // Example 5: In-memory documents take an explicit root
    println!("5. Loading from a string:");
    let inline = r#"
        [[compilers]]
        version = "0.8.19"

        [paths]
        sources = "src"
    "#;
    let raw = ConfigLoader::new().load_str(inline, ConfigFormat::Toml, "/tmp/project")?;
    let resolved = ConfigResolver::resolve_network(&raw, "localhost", &ProcessEnv)?;
    println!(
        "   localhost rpc: {}",
        resolved.network().rpc.as_ref().map(|rpc| rpc.url()).unwrap_or("none")
    );

    println!("\nBasic usage examples completed successfully!");
    Ok(())
}
