#[cfg(feature = "dump")]
use heapless::Deque;

use crate::State;

pub const STATES_HISTORY_SIZE: usize = 8;

/// Diagnostic snapshot of the protocol state and the states that led to it.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StateDump {
    pub current_state: State,
    /// Oldest first; unused slots at the front are `State::Idle`.
    pub state_history: [State; STATES_HISTORY_SIZE],
    pub event_count: u8,
    pub error_count: u8,
}

pub struct StateHolder {
    state: State,
    #[cfg(feature = "dump")]
    history: Deque<State, STATES_HISTORY_SIZE>,
}

impl StateHolder {
    pub const fn new() -> Self {
        Self {
            state: State::Idle,
            #[cfg(feature = "dump")]
            history: Deque::new(),
        }
    }

    pub fn set_state(&mut self, state: State) {
        if state != self.state {
            trace!("i2c: {} -> {}", self.state, state);
            #[cfg(feature = "dump")]
            self.add_state_in_history(state);
        }
        self.state = state;
    }

    pub fn get_state(&self) -> State {
        self.state
    }

    pub fn history(&self) -> [State; STATES_HISTORY_SIZE] {
        #[allow(unused_mut)]
        let mut arr = [State::Idle; STATES_HISTORY_SIZE];

        #[cfg(feature = "dump")]
        {
            let n = self.history.len();
            let (a, b) = self.history.as_slices();
            let s = STATES_HISTORY_SIZE - n;

            arr[s..s + a.len()].copy_from_slice(a);
            arr[s + a.len()..].copy_from_slice(b);
        }

        arr
    }

    #[cfg(feature = "dump")]
    fn add_state_in_history(&mut self, state: State) {
        if self.history.is_full() {
            self.history.pop_front();
        }
        // Cannot fail, a slot was just freed.
        let _ = self.history.push_back(state);
    }
}
