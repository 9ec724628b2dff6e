use crate::error::{NativeError, NativeResult};

/// Gas budget of one transaction, in datoshi.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GasMeter {
    limit: i64,
    consumed: i64,
}

impl GasMeter {
    pub fn new(limit: i64) -> Self {
        Self { limit, consumed: 0 }
    }

    pub fn limit(&self) -> i64 {
        self.limit
    }

    pub fn consumed(&self) -> i64 {
        self.consumed
    }

    pub fn remaining(&self) -> i64 {
        self.limit.saturating_sub(self.consumed).max(0)
    }

    /// Adds `amount` to the consumed gas. A charge that would exceed the limit
    /// (or a negative one) fails and leaves the meter untouched.
    pub fn charge(&mut self, amount: i64) -> NativeResult<()> {
        match self.consumed.checked_add(amount) {
            Some(total) if amount >= 0 && total <= self.limit => {
                self.consumed = total;
                Ok(())
            }
            _ => Err(NativeError::InsufficientGas {
                required: amount,
                available: self.remaining(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn charge_up_to_limit() {
        let mut gas = GasMeter::new(100);
        gas.charge(60).unwrap();
        gas.charge(40).unwrap();
        assert_eq!(gas.remaining(), 0);
        assert_eq!(gas.consumed(), 100);
    }

    #[test]
    fn failed_charge_deducts_nothing() {
        let mut gas = GasMeter::new(100);
        gas.charge(30).unwrap();
        let err = gas.charge(71).unwrap_err();
        assert_eq!(
            err,
            NativeError::InsufficientGas {
                required: 71,
                available: 70
            }
        );
        assert_eq!(gas.consumed(), 30);
        assert!(gas.charge(-1).is_err());
        assert!(gas.charge(i64::MAX).is_err());
        assert_eq!(gas.consumed(), 30);
    }
}
