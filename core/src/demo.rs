//! Sample workload: sum a list with a pause after every item, then square the sum
//!
//! The same computation is written twice: once as a resumable body that an
//! external loop steps, and once as an ordinary blocking function.

use crate::prologue;
use crate::runtime::{CallStack, FrameScope, LatentError, ResumableCall, ResumePoint, Step};
use crate::stdlib::time;
use std::time::Duration;
use tracing::info;

/// Pause after each item
pub const ITEM_WAIT_MS: i64 = 1000;

/// Pause before producing the result
pub const FINAL_WAIT_MS: i64 = 2000;

const NEXT_ITEM: ResumePoint = ResumePoint::new(1);
const ITEM_WAIT: ResumePoint = ResumePoint::new(2);
const FINAL_WAIT: ResumePoint = ResumePoint::new(3);

/// params: result: i64, items: Vec<i64>; locals: i: usize, sum: i64
pub fn sum_items_squared(stack: &mut CallStack) -> Result<Step, LatentError> {
    prologue!(stack;
        param result: i64,
        param items: Vec<i64>,
        local i: usize,
        local sum: i64,
    );

    let mut scope = FrameScope::enter(stack)?;
    loop {
        match scope.resume_point()? {
            ResumePoint::START => {
                scope.set(sum, 0)?;
                scope.set(i, 0)?;
                scope.jump(NEXT_ITEM)?;
            }
            NEXT_ITEM => {
                let index = *scope.get(i)?;
                let Some(&item) = scope.get(items)?.get(index) else {
                    info!("all items accumulated");
                    scope.jump(FINAL_WAIT)?;
                    continue;
                };

                let total = scope.get_mut(sum)?;
                *total = total
                    .checked_add(item)
                    .ok_or(LatentError::overflow("sum of items"))?;
                info!(sum = *total, "accumulated item");
                scope.jump(ITEM_WAIT)?;
            }
            ITEM_WAIT => {
                if !scope.call_with(time::wait_ms, ITEM_WAIT_MS)?.is_done() {
                    return Ok(Step::Yield);
                }
                *scope.get_mut(i)? += 1;
                scope.jump(NEXT_ITEM)?;
            }
            FINAL_WAIT => {
                if !scope.call_with(time::wait_ms, FINAL_WAIT_MS)?.is_done() {
                    return Ok(Step::Yield);
                }
                let total = *scope.get(sum)?;
                let squared = total
                    .checked_mul(total)
                    .ok_or(LatentError::overflow("square of sum"))?;
                scope.set(result, squared)?;
                return Ok(Step::Done);
            }
            other => return Err(LatentError::unknown_resume_point(other)),
        }
    }
}

/// Build a call for [`sum_items_squared`] with the result slot reserved
pub fn prepare_call(items: Vec<i64>) -> Result<ResumableCall, LatentError> {
    let mut call = ResumableCall::new();
    call.push_param(0_i64)?;
    call.push_param(items)?;
    Ok(call)
}

/// Blocking counterpart of [`sum_items_squared`]; `sleep` performs each pause.
///
/// Returns `None` as soon as the sum or its square overflows `i64`.
pub fn sum_items_squared_blocking(
    items: &[i64],
    mut sleep: impl FnMut(Duration),
) -> Option<i64> {
    let mut sum: i64 = 0;
    for item in items {
        sum = sum.checked_add(*item)?;
        info!(sum, "accumulated item");
        sleep(Duration::from_millis(ITEM_WAIT_MS.unsigned_abs()));
    }

    info!("all items accumulated");
    sleep(Duration::from_millis(FINAL_WAIT_MS.unsigned_abs()));

    sum.checked_mul(sum)
}
