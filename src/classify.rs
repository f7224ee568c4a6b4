/*!
 * Primality Classifier
 *
 * Pure predicate applied by workers to every item.
 */

use crate::core::types::WorkItem;

/// Whether `n` is prime
///
/// Trial division by 2, 3 and then the 6k±1 candidates up to √n.
/// Anything below 2 (zero, one, negatives) is not prime.
pub fn is_prime(n: WorkItem) -> bool {
    if n < 2 {
        return false;
    }
    if n < 4 {
        return true;
    }
    if n % 2 == 0 || n % 3 == 0 {
        return false;
    }
    let mut i: WorkItem = 5;
    // i <= n / i avoids overflowing i * i near i64::MAX
    while i <= n / i {
        if n % i == 0 || n % (i + 2) == 0 {
            return false;
        }
        i += 6;
    }
    true
}
