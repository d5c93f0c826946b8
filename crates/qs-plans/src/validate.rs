//! Static plan checks against the network.
//!
//! Run once before the loop starts; a failure aborts the run.

use qs_core::AgentId;
use qs_network::Network;

use crate::{Plan, PlanError, PlanResult};

/// Check that every link `plan` mentions exists and that every route is a
/// connected path from its origin activity link to its destination
/// activity link.
pub fn validate_plan(agent: AgentId, plan: &Plan, network: &Network) -> PlanResult<()> {
    for act in plan.activities() {
        if !network.contains_link(act.link) {
            return Err(PlanError::UnknownLink { agent, link: act.link });
        }
    }

    for (i, leg) in plan.legs().iter().enumerate() {
        let origin = plan.activities()[i].link;
        let dest   = plan.activities()[i + 1].link;

        if let Some(&link) = leg.route.iter().find(|l| !network.contains_link(**l)) {
            return Err(PlanError::UnknownLink { agent, link });
        }

        let (Some(&first), Some(&last)) = (leg.route.first(), leg.route.last()) else {
            if origin != dest {
                return Err(PlanError::EmptyRoute { agent, leg: i });
            }
            continue;
        };
        if first != origin {
            return Err(PlanError::RouteStart { agent, leg: i, expected: origin, found: first });
        }
        if last != dest {
            return Err(PlanError::RouteEnd { agent, leg: i, expected: dest, found: last });
        }
        for pair in leg.route.windows(2) {
            if !network.connects(pair[0], pair[1]) {
                return Err(PlanError::Disconnected { agent, leg: i, from: pair[0], to: pair[1] });
            }
        }
    }

    for i in 0..plan.last_activity() {
        let act = &plan.activities()[i];
        if act.end_time.is_none() && act.duration_secs.is_none() && plan.legs()[i].departure_time.is_none() {
            return Err(PlanError::NoEndTime { agent, activity: i });
        }
    }

    Ok(())
}

/// Validate every plan; `plans[i]` belongs to `AgentId(i)`.
pub fn validate_plans(plans: &[Plan], network: &Network) -> PlanResult<()> {
    plans
        .iter()
        .enumerate()
        .try_for_each(|(i, plan)| validate_plan(AgentId(i as u32), plan, network))
}
