//! Conditional-threshold linearization.
//!
//! "If `b` is set then `counter > k`" is not linear. It is rewritten with a
//! fresh binary indicator `d` that is forced to 1 exactly when
//! `counter <= k`, and `b` is then forbidden whenever `d` is set.

use good_lp::{Expression, Variable};

use crate::model::LinearModel;

impl LinearModel {
    /// Requires `counter > threshold` whenever `b` is 1.
    ///
    /// `counter_bound` is the largest value `counter` can reach. The big-M
    /// constant is derived from it so that it always exceeds every reachable
    /// value. Returns the indicator, which is 1 exactly when
    /// `counter <= threshold`.
    pub fn require_exceeds(
        &mut self,
        counter: Expression,
        threshold: u32,
        counter_bound: u32,
        b: Variable,
    ) -> Variable {
        let big_m = f64::from(counter_bound.max(threshold)) + 1.0;
        let k = f64::from(threshold);
        let d = self.binary();

        let mut shifted = counter;
        shifted.add_mul(big_m, d);
        // counter > k  =>  d = 0
        self.add((shifted.clone() - k).geq(1.0));
        // counter <= k  =>  d = 1
        self.add((shifted - k).leq(big_m));
        self.add((Expression::from(b) + d).leq(1.0));
        d
    }
}
