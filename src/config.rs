use confique::{yaml::FormatOptions, Config as _};
use std::path::PathBuf;

type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Confique(#[from] confique::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Could not determine config dir parent path")]
    ParentPath,

    #[error(transparent)]
    Xdg(#[from] xdg::BaseDirectoriesError),
}

#[derive(Clone, Debug, confique::Config)]
pub struct Config {
    /// Database url. Defaults to an sqlite file under $XDG_DATA_HOME.
    #[config(env = "YATUBE_DATABASE_URL")]
    pub database_url: Option<String>,

    /// Database connection pool size
    #[config(default = 16)]
    pub database_pool_size: usize,

    /// Base64 encoded session signing key. A key is generated at boot when
    /// unset, invalidating sessions across restarts.
    #[config(env = "YATUBE_SESSION_KEY")]
    pub session_key: Option<String>,

    /// Address the server binds to
    #[config(default = "127.0.0.1:8000")]
    pub listen: String,

    /// Directory uploaded post images are stored in, served at /media
    #[config(default = "media")]
    pub media_dir: String,

    /// Posts per listing page
    #[config(default = 10)]
    pub page_size: i64,

    /// Seconds an index page response stays cached
    #[config(default = 20)]
    pub index_cache_ttl_secs: u64,
}

impl Config {
    pub fn load(config_path: Option<PathBuf>) -> Result<Config> {
        let config_path = get_config_path(config_path)?;
        let mut builder = Config::builder().env();
        if config_path.exists() {
            builder = builder.file(config_path);
        }

        Ok(builder.load()?)
    }

    pub fn database_url(&self) -> Result<String> {
        match &self.database_url {
            Some(url) => Ok(url.clone()),
            None => {
                let path = xdg::BaseDirectories::with_prefix("yatube/db")?
                    .place_data_file("database.sqlite3")?;
                Ok(path.to_string_lossy().into_owned())
            }
        }
    }
}

pub fn init_config(config_path: Option<PathBuf>) -> Result<()> {
    let config_path = write_config_template(config_path)?;

    println!(
        "Configuration file created: {}",
        config_path.to_string_lossy()
    );

    Ok(())
}

pub fn get_config_template() -> String {
    confique::yaml::template::<Config>(FormatOptions::default())
}

pub fn print_config_template() {
    println!("{}", get_config_template());
}

pub fn get_config_path(config_path: Option<PathBuf>) -> Result<PathBuf> {
    match config_path {
        Some(path) => Ok(path),
        None => {
            let xdg_dirs = xdg::BaseDirectories::with_prefix("yatube")?;
            Ok(xdg_dirs.get_config_file("config.yml"))
        }
    }
}

pub fn write_config_template(config_path: Option<PathBuf>) -> Result<PathBuf> {
    let config_path = get_config_path(config_path)?;
    let config_template = get_config_template();

    let config_path_dir = config_path.parent().ok_or(Error::ParentPath)?;

    std::fs::create_dir_all(config_path_dir)?;
    std::fs::write(config_path.clone(), config_template)?;

    Ok(config_path)
}
