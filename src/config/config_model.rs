#[derive(Debug, Clone)]
pub struct DotEnvyConfig {
    pub playlist: Playlist,
    pub subscribers: Subscribers,
    pub stats: Stats,
}

#[derive(Debug, Clone)]
pub struct Playlist {
    /// `host[:port]` of the load balancer that serves tokenized outputs.
    pub lb_host: String,
}

#[derive(Debug, Clone)]
pub struct Subscribers {
    pub default_max_devices: usize,
}

#[derive(Debug, Clone)]
pub struct Stats {
    /// Accounting window used when a caller gives no start timestamp.
    pub default_window_secs: i64,
}
