/*!
 * Shard Assignment
 *
 * Pure mapping from an item's position in the stream to the queue it lands
 * in. Swapping the policy never touches queue or worker code.
 */

/// Chooses the shard for each produced item
pub trait ShardPolicy: Send + Sync {
    /// Shard index in `0..shards` for the item at `item_index`
    ///
    /// `shards` is always at least 1.
    fn shard(&self, item_index: u64, shards: usize) -> usize;

    /// Policy name for logs
    fn name(&self) -> &'static str;
}

/// `item_index mod shards`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoundRobin;

impl ShardPolicy for RoundRobin {
    #[inline(always)]
    fn shard(&self, item_index: u64, shards: usize) -> usize {
        (item_index % shards as u64) as usize
    }

    fn name(&self) -> &'static str {
        "round_robin"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_robin_cycles() {
        let assigned: Vec<usize> = (0..7).map(|i| RoundRobin.shard(i, 3)).collect();
        assert_eq!(assigned, vec![0, 1, 2, 0, 1, 2, 0]);
    }

    #[test]
    fn test_round_robin_balance() {
        let shards = 16;
        let mut counts = vec![0u64; shards];
        for i in 0..1_001 {
            counts[RoundRobin.shard(i, shards)] += 1;
        }
        let max = counts.iter().max().unwrap();
        let min = counts.iter().min().unwrap();
        assert!(max - min <= 1);
        assert_eq!(counts.iter().sum::<u64>(), 1_001);
    }

    #[test]
    fn test_single_shard() {
        assert!((0..100).all(|i| RoundRobin.shard(i, 1) == 0));
    }
}
