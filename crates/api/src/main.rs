//! agentprobe - batch agent questions and interaction log export

use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    agentprobe_app::run().await
}
