use super::DriverParams;

/// The position and velocity of the vehicle ahead, as seen by a follower.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Leader {
    /// The leader's position in m.
    pub pos: f64,
    /// The leader's velocity in m/s.
    pub vel: f64,
}

impl Leader {
    /// A leader which imposes no constraint on a vehicle travelling at `vel`:
    /// infinitely far away and moving at the same speed.
    pub fn free_flow(vel: f64) -> Self {
        Self {
            pos: f64::INFINITY,
            vel,
        }
    }
}

impl DriverParams {
    /// Computes an acceleration using the intelligent driver model.
    ///
    /// # Arguments
    /// * `pos` - The position of the simulated vehicle (m).
    /// * `vel` - The velocity of the simulated vehicle (m/s).
    /// * `leader` - The vehicle ahead, or [Leader::free_flow] if there is none.
    ///
    /// The gap to the leader must be strictly positive.
    pub fn acceleration(&self, pos: f64, vel: f64, leader: Leader) -> f64 {
        let net_dist = leader.pos - pos;
        let ss = self.desired_gap(vel, leader.vel);
        let free = (vel / self.desired_velocity).powi(4);
        let term = ss / net_dist;
        self.max_acceleration * (1. - free - (term * term))
    }

    /// The desired minimum gap to the vehicle ahead in m.
    pub fn desired_gap(&self, vel: f64, leader_vel: f64) -> f64 {
        let max_acc = self.max_acceleration; // m.s^-2
        let comf_dec = self.desired_deceleration; // m.s^-2
        let appr = vel - leader_vel;
        let factor = 1. / (2. * (max_acc * comf_dec).sqrt());
        self.jam_distance + f64::max(vel * self.safe_time_headway + vel * appr * factor, 0.0)
    }
}
