//! Allocation of trip days to outbound, destination and return phases.

use serde::Serialize;

/// How many days each phase of a trip gets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DaySplit {
    pub outbound_days: u32,
    pub destination_days: u32,
    pub return_days: u32,
}

impl DaySplit {
    /// Split `days` across the phases of a trip.
    ///
    /// Round trips give a third of the days (at least one) to each travel
    /// leg and the rest to the destination. One-way trips give half (at
    /// least one) to travel. `days == 0` is treated as one day.
    ///
    /// Round trips shorter than three days have no destination days: the
    /// two travel legs already consume them.
    pub fn for_trip(days: u32, round_trip: bool) -> Self {
        let days = days.max(1);
        if round_trip {
            let outbound_days = (days / 3).max(1);
            let return_days = (days / 3).max(1);
            Self {
                outbound_days,
                return_days,
                destination_days: days.saturating_sub(outbound_days + return_days),
            }
        } else {
            let outbound_days = (days / 2).max(1);
            Self {
                outbound_days,
                return_days: 0,
                destination_days: days.saturating_sub(outbound_days),
            }
        }
    }

    /// Total number of days in the itinerary.
    ///
    /// May exceed the requested count for round trips of one day, where
    /// each travel leg still needs its own day.
    pub fn total(&self) -> u32 {
        self.outbound_days + self.destination_days + self.return_days
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_six_days() {
        assert_eq!(
            DaySplit::for_trip(6, true),
            DaySplit {
                outbound_days: 2,
                destination_days: 2,
                return_days: 2
            }
        );
    }

    #[test]
    fn one_way_five_days() {
        assert_eq!(
            DaySplit::for_trip(5, false),
            DaySplit {
                outbound_days: 2,
                destination_days: 3,
                return_days: 0
            }
        );
    }

    #[test]
    fn short_round_trips_clamp_destination() {
        let two = DaySplit::for_trip(2, true);
        assert_eq!((two.outbound_days, two.destination_days, two.return_days), (1, 0, 1));

        let one = DaySplit::for_trip(1, true);
        assert_eq!((one.outbound_days, one.destination_days, one.return_days), (1, 0, 1));
        assert_eq!(one.total(), 2);
    }

    #[test]
    fn zero_days_is_one() {
        assert_eq!(DaySplit::for_trip(0, false), DaySplit::for_trip(1, false));
        let s = DaySplit::for_trip(0, false);
        assert_eq!((s.outbound_days, s.destination_days, s.return_days), (1, 0, 0));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn travel_phases_get_at_least_one_day(days in 0u32..60, round_trip in any::<bool>()) {
                let s = DaySplit::for_trip(days, round_trip);
                prop_assert!(s.outbound_days >= 1);
                prop_assert_eq!(s.return_days >= 1, round_trip);
            }

            #[test]
            fn total_matches_request_when_possible(days in 3u32..60, round_trip in any::<bool>()) {
                prop_assert_eq!(DaySplit::for_trip(days, round_trip).total(), days);
            }
        }
    }
}
