//! wsRelay probe binary.
//!
//! Connects a channel to the endpoint in `wsrelay.yaml` and logs the event
//! stream until Ctrl-C. Useful for checking an endpoint by hand.

use tracing_subscriber::{fmt, EnvFilter};

use wsrelay_client::{config, Channel, ChannelEvent};

#[tokio::main]
async fn main() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let cfg = config::load_from_file("wsrelay.yaml").expect("config load failed");
    tracing::info!(endpoint = %cfg.endpoint, "wsrelay probe starting");

    let mut channel = Channel::new(cfg).expect("channel build failed");
    let mut events = channel.take_events().expect("event stream already taken");
    channel.connect();

    loop {
        tokio::select! {
            ev = events.recv() => match ev {
                None => break,
                Some(ChannelEvent::Open) => tracing::info!("transport open"),
                Some(ChannelEvent::ConnectSuccess) => tracing::info!("connected"),
                Some(ChannelEvent::Message(env)) => {
                    tracing::info!(msg_type = %env.msg_type, id = ?env.id, "message");
                }
                Some(ChannelEvent::Error(msg)) => tracing::warn!(%msg, "channel error"),
                Some(ChannelEvent::Closed { intentional }) => {
                    tracing::info!(intentional, "closed");
                }
            },
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("shutting down");
                channel.disconnect();
                break;
            }
        }
    }
}
