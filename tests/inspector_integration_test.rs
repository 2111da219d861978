//! End-to-end tests of the inspector API against an in-process memory

use pretty_assertions::assert_eq;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use wasm_memscan::config::Config;
use wasm_memscan::core::types::{Address, Comparison, MemoryError, MemoryValue, ValueType, PAGE_SIZE};
use wasm_memscan::memory::{narrow, share, GrowEvent, LinearMemory, MemoryView, VecMemory};
use wasm_memscan::{Clock, Inspector, ManualClock, ScanCandidate};

fn inspector_over(memory: VecMemory) -> (Arc<ManualClock>, Inspector<Arc<ManualClock>>) {
    let real = Arc::new(ManualClock::new(Duration::from_secs(100)));
    let mut inspector = Inspector::with_clock(&Config::default(), Arc::clone(&real)).unwrap();
    assert!(inspector.attach(share(memory)).unwrap());
    (real, inspector)
}

#[test]
fn test_scan_then_narrow_unchanged() {
    let (_real, mut inspector) = inspector_over(VecMemory::from_bytes(vec![0; 16]));
    inspector.write(Address::new(0), MemoryValue::I32(100)).unwrap();
    inspector.write(Address::new(8), MemoryValue::I32(100)).unwrap();

    inspector.scan("100", ValueType::I32, Comparison::Equal).unwrap();
    assert_eq!(
        inspector.candidates(),
        &[
            ScanCandidate::new(Address::new(0), MemoryValue::I32(100)),
            ScanCandidate::new(Address::new(8), MemoryValue::I32(100)),
        ]
    );

    inspector.write(Address::new(8), MemoryValue::I32(200)).unwrap();
    inspector.narrow("100", Comparison::Unchanged).unwrap();
    assert_eq!(
        inspector.candidates(),
        &[ScanCandidate::new(Address::new(0), MemoryValue::I32(100))]
    );
}

#[test]
fn test_add_and_remove_watch() {
    let (_real, mut inspector) = inspector_over(VecMemory::from_bytes(vec![0; 16]));
    inspector.add_watch(Address::new(4), "hp", ValueType::I32);
    inspector.remove_watch(Address::new(4));
    assert!(inspector.list_watches().is_empty());
}

#[test]
fn test_operations_before_attach() {
    let mut inspector = Inspector::new(&Config::default()).unwrap();
    assert!(matches!(
        inspector.read(Address::new(0), ValueType::I32),
        Err(MemoryError::NotInitialized)
    ));
    assert!(matches!(
        inspector.write(Address::new(0), MemoryValue::I32(1)),
        Err(MemoryError::NotInitialized)
    ));
    assert!(matches!(
        inspector.scan("1", ValueType::I32, Comparison::Equal),
        Err(MemoryError::NotInitialized)
    ));
    // nothing to narrow, so no attachment is needed
    assert_eq!(inspector.narrow("1", Comparison::Equal).unwrap().results, 0);

    let watch = inspector.add_watch(Address::new(0), "early", ValueType::U8);
    assert_eq!(watch.value, None);
}

#[test]
fn test_growth_keeps_candidates_and_extends_scan_range() {
    let (_real, mut inspector) = inspector_over(VecMemory::new(1, 4).unwrap());
    let grown: Arc<Mutex<Vec<GrowEvent>>> = Arc::default();
    let sink = Arc::clone(&grown);
    inspector.subscribe_grow(Box::new(move |event| sink.lock().unwrap().push(*event)));

    inspector.write(Address::new(16), MemoryValue::U32(0xCAFE)).unwrap();
    inspector.scan("0xCAFE", ValueType::U32, Comparison::Equal).unwrap();
    assert_eq!(inspector.candidates().len(), 1);

    inspector.grow(1).unwrap();
    assert_eq!(inspector.memory_size(), 2 * PAGE_SIZE);
    assert_eq!(grown.lock().unwrap().len(), 1);

    // contents survive the relocation
    inspector.narrow("0xCAFE", Comparison::Equal).unwrap();
    assert_eq!(inspector.candidates().len(), 1);

    // the new page is scanned by the next first scan
    let far = Address::new(PAGE_SIZE + 64);
    inspector.write(far, MemoryValue::U32(0xCAFE)).unwrap();
    inspector.scan("51966", ValueType::U32, Comparison::Equal).unwrap();
    let addresses: Vec<Address> = inspector.candidates().iter().map(|c| c.address).collect();
    assert_eq!(addresses, vec![Address::new(16), far]);
}

#[test]
fn test_external_growth_notification() {
    let handle = share(VecMemory::new(1, 2).unwrap());
    let mut inspector = Inspector::new(&Config::default()).unwrap();
    inspector.attach(Arc::clone(&handle)).unwrap();

    let new_size = {
        let mut memory = handle.lock().unwrap();
        memory.grow(1).unwrap();
        memory.size()
    };
    inspector.on_grow(new_size);
    assert_eq!(inspector.memory_size(), 2 * PAGE_SIZE);
    assert!(inspector.read(Address::new(PAGE_SIZE + 4), ValueType::I32).is_ok());
}

#[test]
fn test_candidates_past_a_smaller_replacement_are_dropped() {
    let (_real, mut inspector) = inspector_over(VecMemory::from_bytes(vec![7; 32]));
    inspector.scan("7", ValueType::U8, Comparison::Equal).unwrap();
    assert_eq!(inspector.candidates().len(), 32);

    // narrow the same candidates against a shorter memory
    let mut session = inspector.session().clone();
    let smaller = MemoryView::attached(share(VecMemory::from_bytes(vec![7; 8]))).unwrap();
    let report = narrow(
        &smaller,
        &mut session,
        Some(7.0),
        Comparison::Equal,
        &Default::default(),
    )
    .unwrap();
    assert_eq!(report.results, 8);
    assert_eq!(report.skipped, 24);
}

#[test]
fn test_clock_pause_and_resume() {
    let (real, inspector) = inspector_over(VecMemory::from_bytes(vec![0; 4]));
    assert_eq!(inspector.now(), Duration::from_secs(100));

    inspector.set_rate(0.0).unwrap();
    let frozen = inspector.now();
    real.advance(Duration::from_secs(7));
    assert_eq!(inspector.now(), frozen);

    inspector.set_rate(3.0).unwrap();
    assert_eq!(inspector.now(), frozen);
    real.advance(Duration::from_secs(2));
    assert_eq!(inspector.now(), frozen + Duration::from_secs(6));

    assert!(matches!(
        inspector.set_rate(-0.1),
        Err(MemoryError::InvalidRate(_))
    ));
    assert_eq!(inspector.rate(), 3.0);
}

#[test]
fn test_timer_code_consumes_virtual_clock() {
    struct Cooldown<C: Clock> {
        clock: C,
        ready_at: Duration,
    }

    impl<C: Clock> Cooldown<C> {
        fn start(clock: C, length: Duration) -> Self {
            let ready_at = clock.now() + length;
            Cooldown { clock, ready_at }
        }

        fn ready(&self) -> bool {
            self.clock.now() >= self.ready_at
        }
    }

    let (real, inspector) = inspector_over(VecMemory::from_bytes(vec![0; 4]));
    inspector.set_rate(0.5).unwrap();
    let cooldown = Cooldown::start(inspector.clock(), Duration::from_secs(10));

    real.advance(Duration::from_secs(10));
    assert!(!cooldown.ready());
    real.advance(Duration::from_secs(10));
    assert!(cooldown.ready());
}
