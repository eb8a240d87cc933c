// src/breakdown/alliance.rs
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alliance {
    Blue,
    Red,
}

impl Alliance {
    /// Output order; blue first, as in the reports.
    pub const ALL: [Alliance; 2] = [Alliance::Blue, Alliance::Red];

    pub fn key(self) -> &'static str {
        match self {
            Alliance::Blue => "blue",
            Alliance::Red => "red",
        }
    }

    pub fn opponent(self) -> Alliance {
        match self {
            Alliance::Blue => Alliance::Red,
            Alliance::Red => Alliance::Blue,
        }
    }
}

/// A value per alliance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerAlliance<T> {
    pub blue: T,
    pub red: T,
}

impl<T> PerAlliance<T> {
    pub fn new(blue: T, red: T) -> Self {
        Self { blue, red }
    }

    pub fn from_fn(mut f: impl FnMut(Alliance) -> T) -> Self {
        Self { blue: f(Alliance::Blue), red: f(Alliance::Red) }
    }

    /// Both or nothing: the first failure is returned and nothing is kept.
    pub fn try_from_fn<E>(mut f: impl FnMut(Alliance) -> Result<T, E>) -> Result<Self, E> {
        Ok(Self { blue: f(Alliance::Blue)?, red: f(Alliance::Red)? })
    }

    pub fn get(&self, a: Alliance) -> &T {
        match a {
            Alliance::Blue => &self.blue,
            Alliance::Red => &self.red,
        }
    }

    pub fn get_mut(&mut self, a: Alliance) -> &mut T {
        match a {
            Alliance::Blue => &mut self.blue,
            Alliance::Red => &mut self.red,
        }
    }

    pub fn map<U>(self, mut f: impl FnMut(Alliance, T) -> U) -> PerAlliance<U> {
        PerAlliance { blue: f(Alliance::Blue, self.blue), red: f(Alliance::Red, self.red) }
    }

    pub fn try_map<U, E>(self, mut f: impl FnMut(Alliance, T) -> Result<U, E>) -> Result<PerAlliance<U>, E> {
        Ok(PerAlliance { blue: f(Alliance::Blue, self.blue)?, red: f(Alliance::Red, self.red)? })
    }

    pub fn as_ref(&self) -> PerAlliance<&T> {
        PerAlliance { blue: &self.blue, red: &self.red }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn try_from_fn_is_all_or_nothing() {
        let ok: Result<PerAlliance<i64>, String> = PerAlliance::try_from_fn(|a| Ok(a.key().len() as i64));
        assert_eq!(ok.unwrap(), PerAlliance::new(4, 3));

        let err: Result<PerAlliance<i64>, String> = PerAlliance::try_from_fn(|a| match a {
            Alliance::Blue => Ok(1),
            Alliance::Red => Err(s!("red failed")),
        });
        assert_eq!(err.unwrap_err(), "red failed");
    }

    #[test]
    fn serializes_keyed_by_colour() {
        let p = PerAlliance::new(1, 2);
        assert_eq!(serde_json::to_string(&p).unwrap(), r#"{"blue":1,"red":2}"#);
        assert_eq!(Alliance::Red.opponent(), Alliance::Blue);
    }
}
