pub mod access;
pub mod naming;
pub mod network;
pub mod resolve;
pub mod suffix;

pub use access::{build_encryption_binding, build_key_access_grant, KEY_PERMISSIONS};
pub use naming::{check_name, derive_name};
pub use network::resolve_network_access;
pub use resolve::{bind, outputs, resolve};
pub use suffix::{derive_suffix, SUFFIX_LEN};
