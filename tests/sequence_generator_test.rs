// ==========================================
// 业务单号序列生成器测试
// ==========================================
// 覆盖: 并发签发不重号且从 max 起连续、陈旧快照下的复核重试、
//       前缀互不干扰
// ==========================================

use inventory_ops::engine::sequence::{SequenceGenerator, SequenceQuery};
use inventory_ops::logging;
use inventory_ops::repository::error::RepositoryResult;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::thread;

/// 模拟"陈旧读"的查询方: last_sequence 永远返回导入前的快照，
/// exists 只认初始占用集——并发安全只能靠生成器自身保证
struct SnapshotQuery {
    last: Option<i64>,
    taken: Mutex<HashSet<String>>,
}

impl SnapshotQuery {
    fn new(last: Option<i64>, taken: &[&str]) -> Self {
        Self {
            last,
            taken: Mutex::new(taken.iter().map(|s| s.to_string()).collect()),
        }
    }
}

impl SequenceQuery for SnapshotQuery {
    fn last_sequence(&self, _prefix: &str) -> RepositoryResult<Option<i64>> {
        Ok(self.last)
    }

    fn exists(&self, number: &str) -> RepositoryResult<bool> {
        Ok(self.taken.lock().unwrap().contains(number))
    }
}

#[test]
fn test_concurrent_next_returns_distinct_gapless_numbers() {
    logging::init_test();

    let generator = Arc::new(SequenceGenerator::new());
    let query = Arc::new(SnapshotQuery::new(Some(3), &[]));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let generator = Arc::clone(&generator);
            let query = Arc::clone(&query);
            thread::spawn(move || generator.next("SOLM-PO-2025", query.as_ref()).unwrap())
        })
        .collect();

    let mut numbers: Vec<String> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    numbers.sort();

    // 8 个并发调用: 互不重号，且从 max+1 起连续无空洞
    let expected: Vec<String> = (4..12).map(|n| format!("SOLM-PO-2025-{:04}", n)).collect();
    assert_eq!(numbers, expected);
}

#[test]
fn test_recheck_skips_numbers_already_taken_in_store() {
    logging::init_test();

    let generator = SequenceGenerator::new();
    // 陈旧快照说 max=0，但库里 0001/0002 已被占用
    let query = SnapshotQuery::new(None, &["SOLM-PO-2025-0001", "SOLM-PO-2025-0002"]);

    let number = generator.next("SOLM-PO-2025", &query).unwrap();
    assert_eq!(number, "SOLM-PO-2025-0003");
}

#[test]
fn test_prefixes_are_independent() {
    logging::init_test();

    let generator = SequenceGenerator::new();
    let query_a = SnapshotQuery::new(Some(7), &[]);
    let query_b = SnapshotQuery::new(None, &[]);

    assert_eq!(
        generator.next("SOLM-PO-2025", &query_a).unwrap(),
        "SOLM-PO-2025-0008"
    );
    // 另一个前缀（另一年度）从自己的 max 起步，不受影响
    assert_eq!(
        generator.next("SOLM-PO-2026", &query_b).unwrap(),
        "SOLM-PO-2026-0001"
    );
}

#[test]
fn test_same_prefix_sequential_calls_do_not_repeat() {
    logging::init_test();

    let generator = SequenceGenerator::new();
    let query = SnapshotQuery::new(None, &[]);

    // 同一生成器连续签发（查询方一直返回陈旧的 None）
    let first = generator.next("SOLM-QT-2025", &query).unwrap();
    let second = generator.next("SOLM-QT-2025", &query).unwrap();
    assert_eq!(first, "SOLM-QT-2025-0001");
    assert_eq!(second, "SOLM-QT-2025-0002");
}
