use smallvec::SmallVec;
use std::collections::VecDeque;

/// The name of the pseudo-parameter which restores a vehicle's original driver parameters.
pub const RESET_DRIVER_OPTS: &str = "resetDriverOpts";

/// A driver parameter that can be changed by a scheduled behaviour.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BehaviourParam {
    DesiredVelocity,
    SafeTimeHeadway,
    MaxAcceleration,
    DesiredDeceleration,
    JamDistance,
    /// Restores all of the driver parameters; the accompanying value is ignored.
    Reset,
    /// A name which matches no parameter. Discarded when applied.
    Unknown(String),
}

impl BehaviourParam {
    /// Parses a parameter name as it appears in traffic data.
    pub fn from_name(name: &str) -> Self {
        match name {
            "desiredVelocity" => Self::DesiredVelocity,
            "safeTimeHeadway" => Self::SafeTimeHeadway,
            "maxAcceleration" => Self::MaxAcceleration,
            "desiredDeceleration" => Self::DesiredDeceleration,
            "jamDistance" => Self::JamDistance,
            RESET_DRIVER_OPTS => Self::Reset,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// The name of the parameter as it appears in traffic data.
    pub fn name(&self) -> &str {
        match self {
            Self::DesiredVelocity => "desiredVelocity",
            Self::SafeTimeHeadway => "safeTimeHeadway",
            Self::MaxAcceleration => "maxAcceleration",
            Self::DesiredDeceleration => "desiredDeceleration",
            Self::JamDistance => "jamDistance",
            Self::Reset => RESET_DRIVER_OPTS,
            Self::Unknown(name) => name,
        }
    }
}

/// A single `(parameter, value)` pair of a behaviour.
#[derive(Clone, Debug, PartialEq)]
pub struct ParamChange {
    pub param: BehaviourParam,
    pub value: f64,
}

impl ParamChange {
    /// Creates a parameter change from a parameter name and its new value.
    pub fn new(name: &str, value: f64) -> Self {
        Self {
            param: BehaviourParam::from_name(name),
            value,
        }
    }
}

/// The parameter changes of one behaviour. Rarely more than a couple.
pub type ParamChanges = SmallVec<[ParamChange; 2]>;

/// A change in a vehicle's behaviour, scheduled relative to its spawn time.
#[derive(Clone, Debug, PartialEq)]
pub struct BehaviourSpec {
    /// The time after spawn at which the behaviour takes effect, in s.
    pub offset: f64,
    /// The parameter changes, applied in order.
    pub changes: ParamChanges,
}

impl BehaviourSpec {
    /// Creates a behaviour from `(name, value)` pairs.
    pub fn new<'a>(offset: f64, changes: impl IntoIterator<Item = (&'a str, f64)>) -> Self {
        Self {
            offset,
            changes: changes
                .into_iter()
                .map(|(name, value)| ParamChange::new(name, value))
                .collect(),
        }
    }
}

/// A behaviour waiting to be applied at an absolute simulated time.
#[derive(Clone, Debug)]
pub(crate) struct PendingBehaviour {
    pub implement_time: f64,
    pub changes: ParamChanges,
}

/// The behaviours of a vehicle which have not yet been applied,
/// in ascending order of implementation time.
#[derive(Clone, Debug, Default)]
pub(crate) struct BehaviourQueue {
    items: VecDeque<PendingBehaviour>,
}

impl BehaviourQueue {
    /// Builds the queue for a vehicle spawning at `spawn_time`.
    /// Behaviours with equal implementation times keep their input order.
    pub fn new(spawn_time: f64, specs: &[BehaviourSpec]) -> Self {
        let mut queue = Self::default();
        for spec in specs {
            queue.insert(PendingBehaviour {
                implement_time: spawn_time + spec.offset,
                changes: spec.changes.clone(),
            });
        }
        queue
    }

    fn insert(&mut self, behaviour: PendingBehaviour) {
        let t = behaviour.implement_time;
        let idx = self.items.partition_point(|b| b.implement_time <= t);
        self.items.insert(idx, behaviour);
    }

    /// Removes and returns the earliest behaviour if it is due at time `now`.
    pub fn pop_due(&mut self, now: f64) -> Option<PendingBehaviour> {
        if self.items.front()?.implement_time <= now {
            self.items.pop_front()
        } else {
            None
        }
    }

    /// The implementation times of the pending behaviours.
    pub fn times(&self) -> impl Iterator<Item = f64> + '_ {
        self.items.iter().map(|b| b.implement_time)
    }
}
