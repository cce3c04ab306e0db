pub mod content_synchronizer;
pub mod playlist_builder;
pub mod stats_aggregator;
