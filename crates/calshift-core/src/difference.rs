use tracing::trace;

use crate::calendar::shift_months;
use crate::delta::Delta;
use crate::error::CalendarError;
use crate::point::CalendarPoint;

impl Delta {
    /// The delta that takes `earlier` to `later`, in as many whole months as
    /// possible with the remainder as a duration.
    ///
    /// `earlier + Delta::between(later, earlier)? == later` always holds.
    pub fn between<P: CalendarPoint>(later: P, earlier: P) -> Result<Delta, CalendarError> {
        let mut months = 12 * (i64::from(later.year()) - i64::from(earlier.year()))
            + (i64::from(later.month()) - i64::from(earlier.month()));
        let mut estimate = shift_months(earlier, months)?;

        // Month-end clamping can land past `later` within the final month.
        if later >= earlier && estimate > later {
            months -= 1;
            trace!(months, "difference overshot, stepping back one month");
            estimate = shift_months(earlier, months)?;
        } else if later < earlier && estimate < later {
            months += 1;
            trace!(months, "difference overshot, stepping forward one month");
            estimate = shift_months(earlier, months)?;
        }

        Ok(Delta::new(months, later.duration_since(&estimate)))
    }

    /// Like [`Delta::between`], but a missing point on either side gives the
    /// zero delta.
    pub fn difference<P: CalendarPoint>(
        later: Option<P>,
        earlier: Option<P>,
    ) -> Result<Delta, CalendarError> {
        match (later, earlier) {
            (Some(later), Some(earlier)) => Delta::between(later, earlier),
            _ => Ok(Delta::zero()),
        }
    }
}
