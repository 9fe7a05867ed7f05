//! Library logging.
//!
//! This allows for detailed logging of the memory layer and the containers.

/// Log to the appropriate source.
///
/// The first argument is the level, one of `INTERNAL`, `DEBUG`, `NOTE`, `WARNING` and `ERROR`.
/// The rest of the arguments are just normal formatters.
///
/// With the `log` feature enabled, messages are handed to the `log` crate under the `tinystl`
/// target. Without it, nothing is emitted, but the arguments are still type checked.
macro_rules! log {
    (INTERNAL, $( $arg:tt )*) => {
        log!(@trace, $( $arg )*)
    };
    (DEBUG, $( $arg:tt )*) => {
        log!(@debug, $( $arg )*)
    };
    (NOTE, $( $arg:tt )*) => {
        log!(@info, $( $arg )*)
    };
    (WARNING, $( $arg:tt )*) => {
        log!(@warn, $( $arg )*)
    };
    (ERROR, $( $arg:tt )*) => {
        log!(@error, $( $arg )*)
    };
    (@$lv:ident, $( $arg:tt )*) => {{
        #[cfg(feature = "log")]
        {
            ::log::$lv!(target: "tinystl", $( $arg )*);
        }

        #[cfg(not(feature = "log"))]
        {
            if false {
                let _ = format_args!($( $arg )*);
            }
        }
    }};
}
