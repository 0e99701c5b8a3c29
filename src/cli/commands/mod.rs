//! CLI command implementations
//!
//! Every command returns the process exit code:
//!
//! | Code | Meaning |
//! |------|---------|
//! | 0    | Success |
//! | 1    | Run completed with failed receipts |
//! | 2    | Configuration error |
//! | 3    | Connectivity check failed or run aborted during validation |
//! | 5    | Fatal error |
//! | 130  | Interrupted by a shutdown signal |

pub mod dry_run;
pub mod init;
pub mod migrate;
pub mod status;
pub mod test_connection;
pub mod validate;
