//! Unit tests for qs-plans.

use qs_core::{ActivityId, AgentId, Coord, LinkId, SimClock, Tick};
use qs_network::{LinkSpec, Network, NetworkBuilder};

use crate::{Activity, Leg, Plan};

// ── Helpers ───────────────────────────────────────────────────────────────────

const HOME: ActivityId = ActivityId(0);
const WORK: ActivityId = ActivityId(1);

/// A ring of four links: l0: n0→n1, l1: n1→n2, l2: n2→n3, l3: n3→n0.
fn ring() -> Network {
    let mut b = NetworkBuilder::new();
    let n: Vec<_> = (0..4).map(|i| b.add_node(Coord::new(i as f64 * 100.0, 0.0))).collect();
    for i in 0..4 {
        b.add_link(n[i], n[(i + 1) % 4], LinkSpec::new(100.0, 10.0, 1_800.0, 1.0));
    }
    b.build().unwrap()
}

fn route(ids: &[u32]) -> Vec<LinkId> {
    ids.iter().map(|&i| LinkId(i)).collect()
}

/// Home on l0 until 07:00, work on l2 for 8 h, back home.
fn commute() -> Plan {
    Plan::new(Activity::new(HOME, LinkId(0)).with_end_time(Tick::from_hms(7, 0, 0)))
        .then(Leg::car(route(&[0, 1, 2])), Activity::new(WORK, LinkId(2)).with_duration(8 * 3_600))
        .then(Leg::car(route(&[2, 3, 0])), Activity::new(HOME, LinkId(0)))
}

// ── Plan ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod plan {
    use super::*;

    #[test]
    fn shape() {
        let plan = commute();
        assert_eq!(plan.activities().len(), 3);
        assert_eq!(plan.leg_count(), 2);
        assert_eq!(plan.last_activity(), 2);
        assert_eq!(plan.leg(1).unwrap().route.as_ref(), route(&[2, 3, 0]).as_slice());
    }

    #[test]
    fn end_rules() {
        let start = Tick::from_hms(8, 0, 0);
        let both = Activity::new(WORK, LinkId(0))
            .with_end_time(Tick::from_hms(17, 0, 0))
            .with_duration(3_600);
        assert_eq!(both.end_after(start), Some(Tick::from_hms(9, 0, 0)));

        let end_only = Activity::new(WORK, LinkId(0)).with_end_time(Tick::from_hms(17, 0, 0));
        assert_eq!(end_only.end_after(start), Some(Tick::from_hms(17, 0, 0)));

        let dur_only = Activity::new(WORK, LinkId(0)).with_duration(600);
        assert_eq!(dur_only.end_after(start), Some(Tick::from_hms(8, 10, 0)));

        assert_eq!(Activity::new(WORK, LinkId(0)).end_after(start), None);
    }

    #[test]
    fn last_activity_never_ends() {
        let plan = commute();
        assert_eq!(plan.activity_end(2, Tick(0)), None);
    }

    #[test]
    fn planned_departure_is_the_fallback() {
        let plan = Plan::new(Activity::new(HOME, LinkId(0)))
            .then(Leg::car(route(&[0, 1])).with_departure_time(Tick(500)), Activity::new(WORK, LinkId(1)));
        assert_eq!(plan.activity_end(0, Tick(0)), Some(Tick(500)));
    }

    #[test]
    fn single_link_routes_stay_on_link() {
        assert!(Leg::car(Vec::<LinkId>::new()).stays_on_link());
        assert!(Leg::car(route(&[3])).stays_on_link());
        assert!(!Leg::car(route(&[3, 0])).stays_on_link());
    }
}

// ── Validation ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod validate {
    use super::*;
    use crate::{PlanError, validate_plan, validate_plans};

    fn single_leg(r: &[u32], from: u32, to: u32) -> Plan {
        Plan::new(Activity::new(HOME, LinkId(from)).with_end_time(Tick(10)))
            .then(Leg::car(route(r)), Activity::new(WORK, LinkId(to)))
    }

    #[test]
    fn valid_commute() {
        assert_eq!(validate_plan(AgentId(0), &commute(), &ring()), Ok(()));
    }

    #[test]
    fn unknown_activity_link() {
        let plan = Plan::new(Activity::new(HOME, LinkId(99)));
        assert_eq!(
            validate_plan(AgentId(4), &plan, &ring()),
            Err(PlanError::UnknownLink { agent: AgentId(4), link: LinkId(99) })
        );
    }

    #[test]
    fn unknown_route_link() {
        let plan = single_leg(&[0, 42, 2], 0, 2);
        assert!(matches!(
            validate_plan(AgentId(0), &plan, &ring()),
            Err(PlanError::UnknownLink { link: LinkId(42), .. })
        ));
    }

    #[test]
    fn route_must_start_and_end_on_activity_links() {
        let net = ring();
        assert!(matches!(
            validate_plan(AgentId(0), &single_leg(&[1, 2], 0, 2), &net),
            Err(PlanError::RouteStart { leg: 0, .. })
        ));
        assert!(matches!(
            validate_plan(AgentId(0), &single_leg(&[0, 1], 0, 2), &net),
            Err(PlanError::RouteEnd { leg: 0, .. })
        ));
    }

    #[test]
    fn route_must_be_connected() {
        assert_eq!(
            validate_plan(AgentId(1), &single_leg(&[0, 2], 0, 2), &ring()),
            Err(PlanError::Disconnected {
                agent: AgentId(1),
                leg:   0,
                from:  LinkId(0),
                to:    LinkId(2),
            })
        );
    }

    #[test]
    fn empty_route_only_on_same_link() {
        let net = ring();
        assert_eq!(validate_plan(AgentId(0), &single_leg(&[], 1, 1), &net), Ok(()));
        assert!(matches!(
            validate_plan(AgentId(0), &single_leg(&[], 1, 2), &net),
            Err(PlanError::EmptyRoute { .. })
        ));
    }

    #[test]
    fn intermediate_activity_needs_an_end() {
        let plan = Plan::new(Activity::new(HOME, LinkId(0)))
            .then(Leg::car(route(&[0, 1])), Activity::new(WORK, LinkId(1)));
        assert_eq!(
            validate_plan(AgentId(2), &plan, &ring()),
            Err(PlanError::NoEndTime { agent: AgentId(2), activity: 0 })
        );
    }

    #[test]
    fn validate_all_reports_the_offending_agent() {
        let plans = vec![commute(), commute(), single_leg(&[0, 2], 0, 2)];
        assert!(matches!(
            validate_plans(&plans, &ring()),
            Err(PlanError::Disconnected { agent: AgentId(2), .. })
        ));
    }
}

// ── Cursor transitions ────────────────────────────────────────────────────────

#[cfg(test)]
mod cursor {
    use super::*;
    use crate::{AgentRuntime, PlanCursor, PlanError};

    #[test]
    fn full_day() {
        let mut rt = AgentRuntime::new(vec![commute()]);
        let a = AgentId(0);
        assert_eq!(rt.cursor(a), PlanCursor::AtActivity(0));
        assert_eq!(rt.first_departure(a, Tick(0)), Some(Tick::from_hms(7, 0, 0)));

        let leg = rt.depart(a).unwrap();
        assert_eq!(leg.activity_id, HOME);
        assert_eq!(leg.link, LinkId(0));
        assert_eq!(rt.cursor(a), PlanCursor::Departing(0));
        assert_eq!(rt.current_link(a), LinkId(0));

        for pos in 0..3 {
            rt.enter_link(a).unwrap();
            assert_eq!(rt.cursor(a), PlanCursor::Travelling { leg: 0, pos });
        }
        assert_eq!(rt.current_link(a), LinkId(2));
        // Already on the final link.
        assert!(rt.enter_link(a).is_err());

        let arrived_at = Tick::from_hms(7, 1, 0);
        let next = rt.arrive(a, arrived_at).unwrap();
        assert_eq!(next.activity_id, WORK);
        assert_eq!(next.link, LinkId(2));
        assert_eq!(next.ends_at, Some(arrived_at + 8 * 3_600));
        assert_eq!(rt.cursor(a), PlanCursor::AtActivity(1));

        rt.depart(a).unwrap();
        let home = rt.arrive(a, Tick::from_hms(16, 0, 0)).unwrap();
        assert_eq!(home.ends_at, None);
        assert_eq!(rt.cursor(a), PlanCursor::AtActivity(2));
    }

    #[test]
    fn cannot_depart_from_last_activity() {
        let mut rt = AgentRuntime::new(vec![Plan::new(Activity::new(HOME, LinkId(0)))]);
        assert_eq!(
            rt.depart(AgentId(0)),
            Err(PlanError::InvalidTransition {
                agent:  AgentId(0),
                action: "depart",
                cursor: PlanCursor::AtActivity(0),
            })
        );
    }

    #[test]
    fn cannot_arrive_while_at_activity() {
        let mut rt = AgentRuntime::new(vec![commute()]);
        assert!(rt.arrive(AgentId(0), Tick(0)).is_err());
    }

    #[test]
    fn en_route_lists_travellers() {
        let mut rt = AgentRuntime::new(vec![commute(), commute(), commute()]);
        rt.depart(AgentId(2)).unwrap();
        rt.depart(AgentId(0)).unwrap();
        rt.enter_link(AgentId(0)).unwrap();
        let ids: Vec<_> = rt.en_route().collect();
        assert_eq!(ids, vec![AgentId(0), AgentId(2)]);
    }
}

// ── DepartureQueue ────────────────────────────────────────────────────────────

#[cfg(test)]
mod departure_queue {
    use super::*;
    use crate::{AgentRuntime, DepartureQueue};

    #[test]
    fn push_and_drain() {
        let mut q = DepartureQueue::new();
        q.push(Tick(5), AgentId(1));
        q.push(Tick(5), AgentId(0));
        q.push(Tick(7), AgentId(2));
        assert_eq!(q.len(), 3);
        assert_eq!(q.tick_count(), 2);
        assert_eq!(q.next_tick(), Some(Tick(5)));

        assert!(q.drain_until(Tick(4)).is_empty());
        // Insertion order within a tick.
        assert_eq!(q.drain_until(Tick(5)), vec![AgentId(1), AgentId(0)]);
        assert_eq!(q.len(), 1);
        assert_eq!(q.next_tick(), Some(Tick(7)));
    }

    #[test]
    fn drain_collects_overdue_ticks_in_order() {
        let mut q = DepartureQueue::new();
        q.push(Tick(9), AgentId(3));
        q.push(Tick(2), AgentId(1));
        q.push(Tick(4), AgentId(2));
        assert_eq!(q.drain_until(Tick(10)), vec![AgentId(1), AgentId(2), AgentId(3)]);
        assert!(q.is_empty());
        assert_eq!(q.next_tick(), None);
    }

    #[test]
    fn from_runtime_aligns_to_the_clock() {
        let early = Plan::new(Activity::new(HOME, LinkId(0)).with_end_time(Tick(3)))
            .then(Leg::car(route(&[0, 1])), Activity::new(WORK, LinkId(1)));
        let odd = Plan::new(Activity::new(HOME, LinkId(0)).with_end_time(Tick(107)))
            .then(Leg::car(route(&[0, 1])), Activity::new(WORK, LinkId(1)));
        let stay = Plan::new(Activity::new(HOME, LinkId(0)));
        let rt = AgentRuntime::new(vec![early, odd, stay]);

        let clock = SimClock::new(Tick(100), Tick(1_000), 5);
        let mut q = DepartureQueue::from_runtime(&rt, &clock);
        assert_eq!(q.len(), 2);
        assert_eq!(q.drain_until(Tick(100)), vec![AgentId(0)]);
        assert_eq!(q.drain_until(Tick(105)), Vec::<AgentId>::new());
        assert_eq!(q.drain_until(Tick(110)), vec![AgentId(1)]);
    }
}
