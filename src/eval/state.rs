//! Per-call evaluation context.

use std::any::Any;

use crate::schema::UserData;

/// Context handed to every hook during one evaluation.
///
/// Built once per call and never mutated. `userdata` aliases the schema's
/// and may be held by many concurrent evaluations at once.
#[derive(Debug, Clone, Copy)]
pub struct EvaluationState<'a> {
    gen_id: usize,
    pop_id: usize,
    userdata: &'a UserData,
}

impl<'a> EvaluationState<'a> {
    /// Creates the state for candidate `pop_id` of generation `gen_id`.
    pub fn new(gen_id: usize, pop_id: usize, userdata: &'a UserData) -> Self {
        Self {
            gen_id,
            pop_id,
            userdata,
        }
    }

    /// Generation ordinal.
    pub fn gen_id(&self) -> usize {
        self.gen_id
    }

    /// Slot of the candidate within its generation.
    pub fn pop_id(&self) -> usize {
        self.pop_id
    }

    /// Shared, read-only problem data.
    pub fn userdata(&self) -> &'a UserData {
        self.userdata
    }

    /// Shorthand for `userdata().downcast_ref::<T>()`.
    pub fn data<T: Any>(&self) -> Option<&'a T> {
        self.userdata.downcast_ref::<T>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_fields() {
        let data = UserData::new(42_u32);
        let state = EvaluationState::new(2, 5, &data);
        assert_eq!(state.gen_id(), 2);
        assert_eq!(state.pop_id(), 5);
        assert_eq!(state.data::<u32>(), Some(&42));
        assert!(state.data::<i64>().is_none());
    }

    #[test]
    fn test_states_share_userdata() {
        let data = UserData::new(vec![1, 2, 3]);
        let a = EvaluationState::new(0, 0, &data);
        let b = EvaluationState::new(0, 1, &data);
        assert!(std::ptr::eq(
            a.data::<Vec<i32>>().unwrap(),
            b.data::<Vec<i32>>().unwrap()
        ));
    }
}
