// src/macros.rs
#[macro_export]
macro_rules! s {
    // String shorthand!

    // Zero-arg → String::new()
    () => {
        ::std::string::String::new()
    };
    // Labels, consts, trimmed slices
    ($expr:expr) => {
        ::std::string::String::from($expr)
    };
}

/// Field-name builder: `join!("auto", "CargoPoints")` → `"autoCargoPoints"`.
/// Tail parts may be anything that derefs to `str`, owned or borrowed.
#[macro_export]
macro_rules! join {
    ($first:expr $(, $rest:expr)+ $(,)?) => {{
        let mut s = ::std::string::String::from($first);
        $(
            s.push_str(::core::convert::AsRef::<str>::as_ref(&$rest));
        )+
        s
    }};
}

#[cfg(test)]
mod tests {
    #[test]
    fn join_builds_field_names() {
        let label = s!("hatch panels dropped");
        assert_eq!(join!("!", &label), "!hatch panels dropped");
        let exit = s!("Far");
        assert_eq!(join!("teleop", "Cargo", "Upper", exit.as_str()), "teleopCargoUpperFar");
        assert_eq!(join!("frc", s!("254")), "frc254");
    }
}
