//! Schedule daemon: enters deletion batches for users whose temporal quota
//! or hard limit is exceeded, or who hold files past the persistence window.

use scour_daemons::driver::Stage;
use scour_daemons::error::Result;

#[tokio::main]
async fn main() -> Result<()> {
    scour_daemons::daemon_main(Stage::Schedule).await
}
