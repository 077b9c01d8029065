//! User authentication: sessions, sign-up, log-in and log-out.

mod cookie;
mod flash;
mod log_in;
mod log_out;
mod middleware;
mod password;
mod sign_up;
mod token;

pub use cookie::DEFAULT_COOKIE_DURATION;
pub(crate) use cookie::get_user_id_from_auth_cookie;
pub(crate) use flash::take_flash;
pub use log_in::post_log_in;
pub use log_out::get_log_out;
pub use middleware::{auth_guard, auth_guard_json};
pub use password::{PASSWORD_HASH_COST, PasswordHash};
pub use sign_up::post_sign_up;

#[cfg(test)]
pub(crate) use cookie::{COOKIE_USER_ID, set_auth_cookie};
#[cfg(test)]
pub(crate) use flash::{COOKIE_FLASH, set_flash};
