use polyconf::{Config, Source};

fn main() -> Result<(), polyconf::ConfigError> {
    let mut config = Config::new();
    config.add_source(Source::new("demos/resources", "config", "demos/out/config.yml"));
    config.add_source(Source::new("demos/resources", "messages", "demos/out/messages.yml"));

    // First run writes the bundled defaults next to the binary; later runs
    // keep whatever the user edited.
    config.save_all_defaults(false)?;
    config.load_all()?;

    println!("greeting: {}", config.get_string("greeting")?);
    println!("config key: {}", config.get_string("config key")?);
    println!("retries: {}", config.get_int_or("network.retries", 3));
    println!("debug: {}", config.get_bool("debug")?);

    config.set_runtime_value("greeting", "overridden at runtime");
    println!("greeting (overridden): {}", config.get_string("greeting")?);

    Ok(())
}
