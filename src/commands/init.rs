use anyhow::Result;
use sevoice::config::Config;
use std::path::PathBuf;

pub async fn run(path: PathBuf) -> Result<()> {
    let config = Config::default();
    let config_path = path.join("sevoice.toml");

    let toml_content = format!(
        r#"# sevoice Configuration

[extraction]
# Path to the 7-Zip executable. A bare name resolves via PATH; point this at
# a portable install otherwise, e.g. "C:/7-ZipPortable/App/7-Zip64/7z.exe".
seven_zip = "{}"

[output]
# The timestamped run directory is created under this directory.
base_dir = "{}"

[normalize]
link_placeholder = "{}"
image_placeholder = "{}"
strip_tags = ["p", "b", "li", "ol", "ul", "sup", "em"]

[logging]
format = "text"
level = "{}"
"#,
        config.extraction.seven_zip.display(),
        config.output.base_dir.display(),
        config.normalize.link_placeholder,
        config.normalize.image_placeholder,
        config.logging.level,
    );

    std::fs::write(&config_path, toml_content)?;
    println!("Created configuration file: {}", config_path.display());

    Ok(())
}
