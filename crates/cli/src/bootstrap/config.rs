use zonectl_domain::{CliOverrides, Config};

pub fn load_config(config_path: Option<&str>, overrides: CliOverrides) -> anyhow::Result<Config> {
    let config = Config::load(config_path, overrides)?;
    config.validate()?;

    tracing::info!(
        config_file = config_path.unwrap_or("default"),
        sdn_base_url = %config.sdn.base_url,
        cluster_cidr = %config.cluster.cidr,
        subnet_length = config.cluster.subnet_length,
        "configuration loaded"
    );

    Ok(config)
}
