// src/macros.rs
#[macro_export]
macro_rules! s {
    // String shorthand!

    // Zero-arg → String::new()
    () => {
        ::std::string::String::new()
    };
    // Format string with arguments
    ($fmt:literal, $($arg:tt)+) => {
        ::std::format!($fmt, $($arg)+)
    };
    // Any single expression: literals, consts, or vars
    ($expr:expr) => {
        ::std::string::String::from($expr)
    };
}

#[macro_export]
macro_rules! join {
    // String-type concatenation shorthand!
    ($first:expr $(, $rest:expr)+ $(,)?) => {{
        let mut s = ::std::string::String::from($first);
        $(
            s.push_str($rest);
        )+
        s
    }};
}

#[cfg(test)]
mod tests {
    #[test]
    fn s_forms() {
        assert_eq!(s!(), "");
        assert_eq!(s!("abc"), "abc");
        assert_eq!(s!("{}-{}", 1, "b"), "1-b");
    }

    #[test]
    fn join_concatenates() {
        let host = "emerald.puzzlepirates.com";
        assert_eq!(join!("https://", host, "/yoweb"), "https://emerald.puzzlepirates.com/yoweb");
    }
}
