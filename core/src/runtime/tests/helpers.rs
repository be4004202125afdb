//! Resumable bodies shared by the runtime tests

use crate::prologue;
use crate::runtime::{CallStack, FrameScope, LatentError, ResumableCall, ResumePoint, Resumable, Step};
use std::cell::RefCell;
use std::rc::Rc;
use std::task::Poll;

const SECOND: ResumePoint = ResumePoint::new(1);
const THIRD: ResumePoint = ResumePoint::new(2);

/// params: events: Vec<&str>; locals: counter: u32
///
/// Records one event per pass and suspends twice.
pub fn three_phases(stack: &mut CallStack) -> Result<Step, LatentError> {
    prologue!(stack;
        param events: Vec<&'static str>,
        local counter: u32,
    );

    let mut scope = FrameScope::enter(stack)?;
    match scope.resume_point()? {
        ResumePoint::START => {
            scope.get_mut(events)?.push("first");
            *scope.get_mut(counter)? += 1;
            scope.suspend(SECOND)
        }
        SECOND => {
            scope.get_mut(events)?.push("second");
            *scope.get_mut(counter)? += 1;
            scope.suspend(THIRD)
        }
        THIRD => {
            scope.get_mut(events)?.push("third");
            *scope.get_mut(counter)? += 1;
            Ok(Step::Done)
        }
        other => Err(LatentError::unknown_resume_point(other)),
    }
}

/// Call with `events` pushed and `three_phases` started
pub fn started_three_phases() -> ResumableCall {
    let mut call = ResumableCall::new();
    call.push_param(Vec::<&'static str>::new()).unwrap();
    call.start(three_phases).unwrap();
    call
}

const MUTATE: ResumePoint = ResumePoint::new(1);

/// locals: total: i64, text: String, bytes: Vec<u8>
///
/// Mutates every local on every pass; completes once `total` reaches 4.
pub fn mutate_locals(stack: &mut CallStack) -> Result<Step, LatentError> {
    prologue!(stack;
        local total: i64,
        local text: String,
        local bytes: Vec<u8>,
    );

    let mut scope = FrameScope::enter(stack)?;
    match scope.resume_point()? {
        ResumePoint::START | MUTATE => {
            let n = {
                let total = scope.get_mut(total)?;
                *total += 1;
                *total
            };
            scope.get_mut(text)?.push_str(&n.to_string());
            scope.get_mut(bytes)?.push(n as u8);
            scope.suspend_unless(MUTATE, n >= 4)
        }
        other => Err(LatentError::unknown_resume_point(other)),
    }
}

const SQUARE: ResumePoint = ResumePoint::new(1);

/// params: result: i64, x: i64
///
/// Suspends once, then stores `x * x` in the result slot.
pub fn square_later(stack: &mut CallStack) -> Result<Step, LatentError> {
    prologue!(stack;
        param result: i64,
        param x: i64,
    );

    let mut scope = FrameScope::enter(stack)?;
    match scope.resume_point()? {
        ResumePoint::START => scope.suspend(SQUARE),
        SQUARE => {
            let x = *scope.get(x)?;
            scope.set(result, x * x)?;
            Ok(Step::Done)
        }
        other => Err(LatentError::unknown_resume_point(other)),
    }
}

const NEXT: ResumePoint = ResumePoint::new(1);
const SQUARING: ResumePoint = ResumePoint::new(2);

/// params: result: i64, xs: Vec<i64>; locals: i: usize, acc: i64
///
/// Sums the squares of `xs`, computing each square through a nested
/// `square_later` call.
pub fn sum_of_squares(stack: &mut CallStack) -> Result<Step, LatentError> {
    prologue!(stack;
        param result: i64,
        param xs: Vec<i64>,
        local i: usize,
        local acc: i64,
    );

    let mut scope = FrameScope::enter(stack)?;
    loop {
        match scope.resume_point()? {
            ResumePoint::START | NEXT => {
                let index = *scope.get(i)?;
                if index >= scope.get(xs)?.len() {
                    let total = *scope.get(acc)?;
                    scope.set(result, total)?;
                    return Ok(Step::Done);
                }
                scope.jump(SQUARING)?;
            }
            SQUARING => {
                let x = scope.get(xs)?[*scope.get(i)?];
                let squared = match scope.call_for::<i64>(square_later, |callee| {
                    callee.push_param(0_i64)?;
                    callee.push_param(x)
                })? {
                    Poll::Pending => return Ok(Step::Yield),
                    Poll::Ready(squared) => squared,
                };
                *scope.get_mut(acc)? += squared;
                *scope.get_mut(i)? += 1;
                scope.jump(NEXT)?;
            }
            other => return Err(LatentError::unknown_resume_point(other)),
        }
    }
}

const LEAF: ResumePoint = ResumePoint::new(1);
const INNER: ResumePoint = ResumePoint::new(2);

/// params: depth: u32
///
/// Recurses `depth` levels through nested calls; the innermost level
/// suspends once.
pub fn nest(stack: &mut CallStack) -> Result<Step, LatentError> {
    prologue!(stack; param depth: u32);

    let mut scope = FrameScope::enter(stack)?;
    loop {
        match scope.resume_point()? {
            ResumePoint::START => {
                if *scope.get(depth)? == 0 {
                    return scope.suspend(LEAF);
                }
                scope.jump(INNER)?;
            }
            LEAF => return Ok(Step::Done),
            INNER => {
                let next = *scope.get(depth)? - 1;
                return scope.call_with(nest, next);
            }
            other => return Err(LatentError::unknown_resume_point(other)),
        }
    }
}

/// Depths in the order their markers were dropped
pub type DropLog = Rc<RefCell<Vec<u32>>>;

/// Local that records its depth when destroyed
pub struct DepthMarker {
    depth: u32,
    log: DropLog,
}

impl Drop for DepthMarker {
    fn drop(&mut self) {
        self.log.borrow_mut().push(self.depth);
    }
}

/// params: depth: u32, log: DropLog; locals: marker: DepthMarker
///
/// Same shape as `nest`, with a marker local on every level.
pub fn nest_marked(stack: &mut CallStack) -> Result<Step, LatentError> {
    prologue!(stack;
        param depth: u32,
        param log: DropLog,
    );
    let level = *stack.get(depth)?;
    let sink = stack.get(log)?.clone();
    stack.fetch_or_create_next_slot_with(|| DepthMarker { depth: level, log: sink })?;

    let mut scope = FrameScope::enter(stack)?;
    loop {
        match scope.resume_point()? {
            ResumePoint::START => {
                if level == 0 {
                    return scope.suspend(LEAF);
                }
                scope.jump(INNER)?;
            }
            LEAF => return Ok(Step::Done),
            INNER => {
                let sink = scope.get(log)?.clone();
                return scope.call(nest_marked, |callee| {
                    callee.push_param(level - 1)?;
                    callee.push_param(sink)
                });
            }
            other => return Err(LatentError::unknown_resume_point(other)),
        }
    }
}

/// Drive `call` to completion, returning the number of `step()` calls
pub fn step_until_done(call: &mut ResumableCall) -> u64 {
    let mut steps = 0;
    while !call.is_done() {
        call.step().unwrap();
        steps += 1;
    }
    steps
}

/// Start `entry` on a fresh call with the given single parameter
pub fn start_with<A: std::any::Any>(entry: Resumable, arg: A) -> ResumableCall {
    let mut call = ResumableCall::new();
    call.push_param(arg).unwrap();
    call.start(entry).unwrap();
    call
}
