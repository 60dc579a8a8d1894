//! Threaded root-split search.
//!
//! The engine owns a fixed pool of worker threads. Every legal root move
//! becomes a task on a shared stack; idle workers pull tasks, search them on
//! their own copy of the position and report back. Each result tightens the
//! root bound for its depth so later root moves are searched in a narrower
//! window. With iterative mode on, every root move is searched at depth 1
//! first and re-queued one ply deeper until the target depth is reached.

use std::cmp::Ordering as CmpOrdering;
use std::collections::BinaryHeap;
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc, Condvar, Mutex, MutexGuard,
};
use std::thread;
use std::time::{Duration, Instant};

use super::params::{EngineConfig, SearchParams};
use super::worker::{Worker, INFINITE};
use crate::board::{Color, Move, Position};
use crate::eval::Score;

/// Outcome of `Engine::find_best_move`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOutcome {
    pub mv: Move,
    /// Value of `mv`, white positive
    pub eval: Score,
    pub depth: u8,
    pub nodes: u64,
    pub memo_hits: u64,
    pub elapsed: Duration,
}

#[derive(Debug, Clone, Copy)]
struct RootTask {
    /// Position of the move in the root move list
    index: usize,
    mv: Move,
    depth: u8,
}

/// Root task waiting for its next depth, ranked by its previous result
#[derive(Debug, Clone, Copy)]
struct DeferredTask {
    task: RootTask,
    eval: Score,
    side: Color,
}

impl Ord for DeferredTask {
    // Greatest first: shallower depth, then better value for the side to
    // move, then lower root index
    fn cmp(&self, other: &Self) -> CmpOrdering {
        other
            .task
            .depth
            .cmp(&self.task.depth)
            .then_with(|| match self.side {
                Color::White => self.eval.cmp(&other.eval),
                Color::Black => other.eval.cmp(&self.eval),
            })
            .then_with(|| other.task.index.cmp(&self.task.index))
    }
}

impl PartialOrd for DeferredTask {
    fn partial_cmp(&self, other: &Self) -> Option<CmpOrdering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for DeferredTask {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == CmpOrdering::Equal
    }
}

impl Eq for DeferredTask {}

#[derive(Debug, Clone, Copy)]
struct RootResult {
    index: usize,
    mv: Move,
    depth: u8,
    eval: Score,
    /// `eval` is the true value of the move, not just a bound
    exact: bool,
}

struct PoolState {
    stop: bool,
    /// Bumped whenever `position` changes so workers refresh their copy
    generation: u64,
    position: Position,
    pending: Vec<RootTask>,
    deferred: BinaryHeap<DeferredTask>,
    /// Root (alpha, beta) per depth
    bounds: Vec<(Score, Score)>,
    results: Vec<RootResult>,
    active: usize,
    target_depth: u8,
    iterative: bool,
}

impl PoolState {
    fn next_task(&mut self) -> Option<RootTask> {
        match self.pending.pop() {
            Some(task) => Some(task),
            None => self.deferred.pop().map(|d| d.task),
        }
    }

    fn is_idle(&self) -> bool {
        self.pending.is_empty() && self.deferred.is_empty() && self.active == 0
    }
}

struct Shared {
    state: Mutex<PoolState>,
    work_ready: Condvar,
    done: Condvar,
    nodes: AtomicU64,
    memo_hits: AtomicU64,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, PoolState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Multithreaded engine playing one game from a given position
pub struct Engine {
    shared: Arc<Shared>,
    workers: Vec<thread::JoinHandle<()>>,
    position: Position,
    config: EngineConfig,
}

impl Engine {
    /// Start `config.threads` workers (at least one) on `position`
    pub fn new(position: Position, config: EngineConfig) -> Self {
        let num_threads = config.threads.max(1);
        let shared = Arc::new(Shared {
            state: Mutex::new(PoolState {
                stop: false,
                generation: 0,
                position: position.clone(),
                pending: Vec::new(),
                deferred: BinaryHeap::new(),
                bounds: Vec::new(),
                results: Vec::new(),
                active: 0,
                target_depth: config.search.depth,
                iterative: config.iterative,
            }),
            work_ready: Condvar::new(),
            done: Condvar::new(),
            nodes: AtomicU64::new(0),
            memo_hits: AtomicU64::new(0),
        });

        let workers = (0..num_threads)
            .map(|worker_id| {
                let shared = Arc::clone(&shared);
                let worker = Worker::new(position.clone(), config.search.clone());
                thread::spawn(move || worker_loop(worker_id, shared, worker))
            })
            .collect();

        tracing::debug!(threads = num_threads, "engine started");

        Self {
            shared,
            workers,
            position,
            config,
        }
    }

    /// Engine with the default configuration on the standard start position
    pub fn with_start_position() -> Self {
        Self::new(Position::start(), EngineConfig::default())
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn num_threads(&self) -> usize {
        self.workers.len()
    }

    /// Search every root move and return the best one for the side to move.
    ///
    /// Returns `None` when the side to move has no legal move (mate or
    /// stalemate). Among equally valued moves the first one in generation
    /// order wins, independent of thread count and timing.
    pub fn find_best_move(&self) -> Option<SearchOutcome> {
        let root_moves = self.position.generate_moves();
        if root_moves.is_empty() {
            return None;
        }

        let start = Instant::now();
        self.shared.nodes.store(0, Ordering::Relaxed);
        self.shared.memo_hits.store(0, Ordering::Relaxed);

        let target = self.config.search.depth.max(1);
        let first_depth = if self.config.iterative { 1 } else { target };

        let mut state = self.shared.lock();
        state.results.clear();
        state.deferred.clear();
        state.bounds = vec![(-INFINITE, INFINITE); target as usize + 1];
        state.target_depth = target;
        state.iterative = self.config.iterative;
        // stack: reversed so the first generated move is popped first
        state.pending = root_moves
            .iter()
            .enumerate()
            .rev()
            .map(|(index, &mv)| RootTask {
                index,
                mv,
                depth: first_depth,
            })
            .collect();
        self.shared.work_ready.notify_all();

        let state = self
            .shared
            .done
            .wait_while(state, |s| !s.is_idle())
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let side = self.position.side_to_move();
        let best = select_best(&state.results, side)?;
        drop(state);

        let outcome = SearchOutcome {
            mv: best.mv,
            eval: best.eval,
            depth: best.depth,
            nodes: self.shared.nodes.load(Ordering::Relaxed),
            memo_hits: self.shared.memo_hits.load(Ordering::Relaxed),
            elapsed: start.elapsed(),
        };
        tracing::info!(
            mv = %outcome.mv,
            eval = outcome.eval,
            depth = outcome.depth,
            nodes = outcome.nodes,
            memo_hits = outcome.memo_hits,
            elapsed_ms = outcome.elapsed.as_millis() as u64,
            "best move"
        );
        Some(outcome)
    }

    /// Play `mv` on the engine's board if it is legal. Workers pick up the
    /// new position before their next task.
    pub fn process_move(&mut self, mv: Move) -> bool {
        if !self.position.is_legal(mv) {
            return false;
        }
        self.position.process_move(mv);

        let mut state = self.shared.lock();
        state.position = self.position.clone();
        state.generation += 1;
        true
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        self.shared.lock().stop = true;
        self.shared.work_ready.notify_all();
        for handle in self.workers.drain(..) {
            let _ = handle.join();
        }
        tracing::debug!("engine stopped");
    }
}

fn worker_loop(worker_id: usize, shared: Arc<Shared>, mut worker: Worker) {
    let mut generation = 0u64;

    loop {
        // Wait for a task, then take what the search needs under the lock
        let (task, window, side) = {
            let mut state = shared.lock();
            let task = loop {
                if state.stop {
                    return;
                }
                if let Some(task) = state.next_task() {
                    break task;
                }
                state = shared
                    .work_ready
                    .wait(state)
                    .unwrap_or_else(|poisoned| poisoned.into_inner());
            };
            state.active += 1;
            if state.generation != generation {
                generation = state.generation;
                worker.set_position(state.position.clone());
            }
            let side = state.position.side_to_move();
            let (alpha, beta) = state.bounds[task.depth as usize];
            // Widen by one so a move equal to the current best still comes
            // back exact and ties resolve by root index
            let window = match side {
                Color::White => (alpha.saturating_sub(1), beta),
                Color::Black => (alpha, beta.saturating_add(1)),
            };
            (task, window, side)
        };

        let result = worker.search(task.mv, task.depth as i32 - 1, window.0, window.1);
        shared.nodes.fetch_add(result.nodes, Ordering::Relaxed);
        shared.memo_hits.fetch_add(result.memo_hits, Ordering::Relaxed);

        tracing::debug!(
            worker = worker_id,
            mv = %task.mv,
            depth = task.depth,
            eval = result.eval,
            nodes = result.nodes,
            "root move searched"
        );

        let mut state = shared.lock();
        let exact = match side {
            Color::White => result.eval > window.0,
            Color::Black => result.eval < window.1,
        };
        let bound = &mut state.bounds[task.depth as usize];
        bound.0 = bound.0.max(result.alpha);
        bound.1 = bound.1.min(result.beta);

        state.results.push(RootResult {
            index: task.index,
            mv: task.mv,
            depth: task.depth,
            eval: result.eval,
            exact,
        });

        if state.iterative && task.depth < state.target_depth {
            state.deferred.push(DeferredTask {
                task: RootTask {
                    depth: task.depth + 1,
                    ..task
                },
                eval: result.eval,
                side,
            });
            shared.work_ready.notify_one();
        }

        state.active -= 1;
        if state.is_idle() {
            shared.done.notify_all();
        }
    }
}

// Best exact result at the deepest searched depth, lowest index on ties
fn select_best(results: &[RootResult], side: Color) -> Option<RootResult> {
    let deepest = results.iter().map(|r| r.depth).max()?;
    let by_value = |a: &&RootResult, b: &&RootResult| {
        let value = match side {
            Color::White => b.eval.cmp(&a.eval),
            Color::Black => a.eval.cmp(&b.eval),
        };
        value.then_with(|| a.index.cmp(&b.index))
    };

    let at_depth = || results.iter().filter(move |r| r.depth == deepest);
    at_depth()
        .filter(|r| r.exact)
        .min_by(by_value)
        .or_else(|| at_depth().min_by(by_value))
        .copied()
}

/// Convenience for one-off searches: fixed-depth best move with `threads` workers
pub fn best_move(position: &Position, depth: u8, threads: usize) -> Option<SearchOutcome> {
    let config = EngineConfig::new()
        .threads(threads)
        .search_params(SearchParams::new().depth(depth));
    Engine::new(position.clone(), config).find_best_move()
}
