//! Delete daemon: executes deletion batches whose grace deadline has
//! passed, reprieving files the user touched during the notice window.

use scour_daemons::driver::Stage;
use scour_daemons::error::Result;

#[tokio::main]
async fn main() -> Result<()> {
    scour_daemons::daemon_main(Stage::Delete).await
}
