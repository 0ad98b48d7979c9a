//! Scan daemon: walks each user's cache area, reconciles the catalog's file
//! records with what is on disk, and recomputes quota usage.

use scour_daemons::driver::Stage;
use scour_daemons::error::Result;

#[tokio::main]
async fn main() -> Result<()> {
    scour_daemons::daemon_main(Stage::Scan).await
}
