pub mod mock_api;
pub mod sandbox;

pub use insta;

/// `insta::assert_snapshot!` re-export so test crates only depend on this crate
#[macro_export]
macro_rules! assert_snapshot {
    ($($arg:tt)*) => {
        $crate::insta::assert_snapshot!($($arg)*)
    };
}
