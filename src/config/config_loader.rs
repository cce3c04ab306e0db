use anyhow::{Context, Result};

use crate::{
    config::{
        config_model::{DotEnvyConfig, Playlist, Stats, Subscribers},
        stage::Stage,
    },
    domain::value_objects::limits::DEFAULT_DEVICES_COUNT,
};

pub const DEFAULT_STATS_WINDOW_SECS: i64 = 24 * 60 * 60;

pub fn load() -> Result<DotEnvyConfig> {
    dotenvy::dotenv().ok();

    let playlist = Playlist {
        lb_host: std::env::var("PLAYLIST_LB_HOST").context("PLAYLIST_LB_HOST is invalid")?,
    };

    let subscribers = Subscribers {
        default_max_devices: match std::env::var("SUBSCRIBER_DEFAULT_MAX_DEVICES") {
            Ok(raw) => raw
                .parse()
                .context("SUBSCRIBER_DEFAULT_MAX_DEVICES is invalid")?,
            Err(_) => DEFAULT_DEVICES_COUNT,
        },
    };

    let stats = Stats {
        default_window_secs: match std::env::var("STATS_DEFAULT_WINDOW_SECS") {
            Ok(raw) => raw.parse().context("STATS_DEFAULT_WINDOW_SECS is invalid")?,
            Err(_) => DEFAULT_STATS_WINDOW_SECS,
        },
    };

    Ok(DotEnvyConfig {
        playlist,
        subscribers,
        stats,
    })
}

pub fn get_stage() -> Stage {
    dotenvy::dotenv().ok();

    let stage_str = std::env::var("STAGE").unwrap_or("".to_string());
    Stage::try_from(&stage_str).unwrap_or_default()
}
