// src/engine/derive.rs
//! Fields computed after the scan rather than read from a row.
use log::debug;

use crate::breakdown::Alliance;
use crate::config::consts::{RP_LOSS, RP_TIE, RP_WIN};
use crate::error::DecodeError;
use crate::specs::Season;

use super::types::{Accumulator, Neutral, Totals};
use super::Scan;

/// Win/tie/loss ranking points from the two final scores.
pub fn base_ranking_points(own: i64, opponent: i64) -> i64 {
    if own > opponent {
        RP_WIN
    } else if own == opponent {
        RP_TIE
    } else {
        RP_LOSS
    }
}

/// `total - auto - teleop - fouls - season extras`, unless the report had an
/// explicit adjustments row. Negative when the total was zeroed.
pub fn adjust_points<S: Season>(scan: &mut Scan<S>) -> Result<(), DecodeError> {
    for a in Alliance::ALL {
        if scan.sheet().contains(a, "adjustPoints") {
            continue;
        }
        let acc = scan.acc.get(a);
        let adjust = adjustment(acc.totals(), acc.adjust_extra())?;
        scan.sheet().set(a, "adjustPoints", adjust)?;
    }
    Ok(())
}

fn adjustment(t: &Totals, extra: i64) -> Result<i64, DecodeError> {
    [t.auto, t.teleop, t.fouls, extra]
        .into_iter()
        .try_fold(t.total, i64::checked_sub)
        .ok_or_else(|| DecodeError::Invalid(format!("adjust points out of range (total {})", t.total)))
}

/// `a + b` or an out-of-range error naming `what`.
pub fn checked_add(a: i64, b: i64, what: &str) -> Result<i64, DecodeError> {
    a.checked_add(b)
        .ok_or_else(|| DecodeError::Invalid(format!("{what} out of range ({a} + {b})")))
}

/// Bonus flags and `rp`. Disabled bonuses are written `false` and not counted.
pub fn ranking_points<S: Season>(scan: &mut Scan<S>) -> Result<(), DecodeError> {
    for a in Alliance::ALL {
        let own = scan.acc.get(a).totals().total;
        let opp = scan.acc.get(a.opponent()).totals().total;

        let mut computed = 0;
        let mut kept = 0;
        for (i, field) in S::BONUSES.iter().enumerate() {
            let Some(achieved) = S::bonus(scan, a, i) else { continue };
            let on = achieved && scan.config.bonus_enabled(i);
            computed += i64::from(achieved);
            kept += i64::from(on);
            scan.sheet().set(a, field, on)?;
        }

        let rp = match scan.sheet().int(a, "rp") {
            Some(rp) => rp,
            None => checked_add(base_ranking_points(own, opp), computed, "rp")?,
        };
        let rp = checked_add(rp, kept - computed, "rp")?;
        scan.sheet().set(a, "rp", rp)?;
    }
    Ok(())
}

/// Force the season's playoff values. Unverified entries are still applied.
pub fn apply_playoff<S: Season>(scan: &mut Scan<S>) -> Result<(), DecodeError> {
    for rule in S::PLAYOFF {
        if !rule.verified {
            debug!("{}: playoff value for {} is unverified", S::YEAR, rule.field);
        }
        match rule.neutral {
            Neutral::Int(n) => scan.sheet().set_both(rule.field, n)?,
            Neutral::Bool(b) => scan.sheet().set_both(rule.field, b)?,
            Neutral::Absent => {
                for a in Alliance::ALL {
                    scan.sheet().remove(a, rule.field);
                }
            }
        }
    }
    Ok(())
}

/// Fields a playoff breakdown leaves out on purpose.
pub fn playoff_absent<S: Season>() -> Vec<&'static str> {
    S::PLAYOFF
        .iter()
        .filter(|r| r.neutral == Neutral::Absent)
        .map(|r| r.field)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_rp() {
        assert_eq!(base_ranking_points(10, 5), 2);
        assert_eq!(base_ranking_points(5, 5), 1);
        assert_eq!(base_ranking_points(0, 5), 0);
    }

    #[test]
    fn adjustment_subtracts_every_part() {
        let t = Totals { auto: 10, teleop: 30, fouls: 5, total: 50 };
        assert_eq!(adjustment(&t, 0), Ok(5));
        assert_eq!(adjustment(&t, 10), Ok(-5));
    }

    #[test]
    fn adjustment_overflow_is_an_error() {
        let t = Totals { auto: -1, teleop: 0, fouls: 0, total: i64::MAX };
        assert!(matches!(adjustment(&t, 0), Err(DecodeError::Invalid(_))));
        let t = Totals { total: i64::MIN, ..Totals::default() };
        assert!(matches!(adjustment(&t, 1), Err(DecodeError::Invalid(_))));
        assert!(checked_add(i64::MAX, 1, "rp").is_err());
        assert_eq!(checked_add(2, -1, "rp"), Ok(1));
    }
}
