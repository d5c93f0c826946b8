//! Per-agent progress through a plan.
//!
//! # Transitions
//!
//! ```text
//! AtActivity(i) ──depart──▶ Departing(i) ──enter_link──▶ Travelling(i, 0)
//!       ▲                        │                             │ enter_link
//!       │                        │ arrive (route stays on      ▼
//!       │                        │         one link)     Travelling(i, k+1)
//!       └──────── arrive ────────┴─────────────────────────────┘
//!                 (lands on AtActivity(i + 1))
//! ```
//!
//! `Departing` covers the time between the end of an activity and admission
//! to the first link of the route, which can be several ticks when that link
//! is full.

use std::sync::Arc;

use qs_core::{ActivityId, AgentId, LinkId, Tick, TransportMode};

use crate::{Plan, PlanError, PlanResult};

// ── PlanCursor ────────────────────────────────────────────────────────────────

/// Where an agent currently is within its plan.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PlanCursor {
    /// Performing activity `index`.
    AtActivity(usize),
    /// Leg `leg` has started but the vehicle is not on the network yet.
    Departing(usize),
    /// On `route[pos]` of leg `leg`.
    Travelling { leg: usize, pos: usize },
}

impl PlanCursor {
    /// `true` for `Departing` and `Travelling`.
    pub fn is_en_route(self) -> bool {
        !matches!(self, PlanCursor::AtActivity(_))
    }
}

// ── Transition results ────────────────────────────────────────────────────────

/// What the loop needs to put a departing agent on the network.
#[derive(Clone, Debug, PartialEq)]
pub struct LegStart {
    /// Activity that just ended.
    pub activity_id: ActivityId,
    /// Link the agent departs from.
    pub link:        LinkId,
    pub mode:        TransportMode,
    pub route:       Arc<[LinkId]>,
}

/// What the loop needs after an agent completes a leg.
#[derive(Clone, Debug, PartialEq)]
pub struct NextActivity {
    pub activity_id: ActivityId,
    pub link:        LinkId,
    /// When the new activity ends; `None` for the last activity.
    pub ends_at:     Option<Tick>,
}

// ── AgentRuntime ──────────────────────────────────────────────────────────────

/// Plans and cursors for the whole population, indexed by `AgentId`.
///
/// Plans are read-only; only cursors move.
pub struct AgentRuntime {
    plans:   Vec<Plan>,
    cursors: Vec<PlanCursor>,
}

impl AgentRuntime {
    /// Every agent starts at its first activity.
    pub fn new(plans: Vec<Plan>) -> Self {
        let cursors = vec![PlanCursor::AtActivity(0); plans.len()];
        Self { plans, cursors }
    }

    pub fn len(&self) -> usize {
        self.plans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plans.is_empty()
    }

    pub fn plans(&self) -> &[Plan] {
        &self.plans
    }

    #[inline]
    pub fn plan(&self, agent: AgentId) -> &Plan {
        &self.plans[agent.index()]
    }

    #[inline]
    pub fn cursor(&self, agent: AgentId) -> PlanCursor {
        self.cursors[agent.index()]
    }

    /// Agents currently departing or travelling, ascending by id.
    pub fn en_route(&self) -> impl Iterator<Item = AgentId> + '_ {
        AgentId::all(self.cursors.len())
            .zip(&self.cursors)
            .filter(|(_, c)| c.is_en_route())
            .map(|(agent, _)| agent)
    }

    /// The link the agent is on or waiting at.
    pub fn current_link(&self, agent: AgentId) -> LinkId {
        let plan = self.plan(agent);
        match self.cursor(agent) {
            PlanCursor::AtActivity(i) => plan.activities()[i].link,
            PlanCursor::Departing(leg) => plan.activities()[leg].link,
            PlanCursor::Travelling { leg, pos } => plan.legs()[leg].route[pos],
        }
    }

    /// End of the first activity for a run starting at `start`.
    pub fn first_departure(&self, agent: AgentId, start: Tick) -> Option<Tick> {
        self.plan(agent).activity_end(0, start)
    }

    /// End the current activity and start the following leg.
    pub fn depart(&mut self, agent: AgentId) -> PlanResult<LegStart> {
        let cursor = self.cursor(agent);
        let plan = &self.plans[agent.index()];
        let PlanCursor::AtActivity(i) = cursor else {
            return Err(PlanError::InvalidTransition { agent, action: "depart", cursor });
        };
        let Some(leg) = plan.leg(i) else {
            return Err(PlanError::InvalidTransition { agent, action: "depart", cursor });
        };
        let act = &plan.activities()[i];
        let start = LegStart {
            activity_id: act.activity_id,
            link:        act.link,
            mode:        leg.mode,
            route:       Arc::clone(&leg.route),
        };
        self.cursors[agent.index()] = PlanCursor::Departing(i);
        Ok(start)
    }

    /// The agent's vehicle was admitted to the next link of its route.
    pub fn enter_link(&mut self, agent: AgentId) -> PlanResult<()> {
        let cursor = self.cursor(agent);
        let route_len = |leg: usize| self.plans[agent.index()].legs()[leg].route.len();
        let next = match cursor {
            PlanCursor::Departing(leg) if route_len(leg) > 0 => {
                PlanCursor::Travelling { leg, pos: 0 }
            }
            PlanCursor::Travelling { leg, pos } if pos + 1 < route_len(leg) => {
                PlanCursor::Travelling { leg, pos: pos + 1 }
            }
            _ => return Err(PlanError::InvalidTransition { agent, action: "enter a link", cursor }),
        };
        self.cursors[agent.index()] = next;
        Ok(())
    }

    /// Complete the current leg at `tick` and begin the next activity.
    pub fn arrive(&mut self, agent: AgentId, tick: Tick) -> PlanResult<NextActivity> {
        let cursor = self.cursor(agent);
        let leg = match cursor {
            PlanCursor::Departing(leg) => leg,
            PlanCursor::Travelling { leg, .. } => leg,
            PlanCursor::AtActivity(_) => {
                return Err(PlanError::InvalidTransition { agent, action: "arrive", cursor });
            }
        };
        let plan = &self.plans[agent.index()];
        let index = leg + 1;
        let act = &plan.activities()[index];
        let start = NextActivity {
            activity_id: act.activity_id,
            link:        act.link,
            ends_at:     plan.activity_end(index, tick),
        };
        self.cursors[agent.index()] = PlanCursor::AtActivity(index);
        Ok(start)
    }
}
