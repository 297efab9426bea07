// Lightweight verbosity-gated logging helper used throughout the crate.
macro_rules! vprintln {
	($verbose:expr, $level:expr, $($arg:tt)*) => {
		if $verbose >= $level {
			eprintln!($($arg)*);
		}
	};
}

// Public library re-exports for integration tests and external use.
pub mod actions;
pub mod aggregate;
pub mod classify;
pub mod cli;
pub mod config;
pub mod district;
pub mod error;
pub mod fetch;
pub mod navigate;
pub mod page;
pub mod report;
pub mod summary;
pub mod types;

// Keep main.rs thin and have it call into the library functions.
