//! 负载计算
//!
//! 把人员的权重（`default_load`）和当前全局工作量（`overall_load`）换算成本作业中的目标页数。
//! 当前工作量低于平均值的人员获得更高的份额，高于平均值的人员份额降低，
//! 且调整幅度不会让任何人的份额变为负数。

use std::cmp::Ordering;

use allocator_core::models::Worker;
use tracing::debug;

use crate::state::WorkerLoad;

/// 计算每个人员的目标页数
///
/// 返回的目标页数之和严格等于 `total_pages × coverage`，单人目标不超过 `total_pages`
/// （只要人员数量足以容纳覆盖次数），结果按目标页数降序排列。
/// 空人员列表返回空结果。
pub fn calculate_users_load(total_pages: u64, workers: &[Worker], coverage: u32) -> Vec<WorkerLoad> {
    if workers.is_empty() {
        return Vec::new();
    }

    let count = workers.len() as f64;
    let total_default: f64 = workers.iter().map(|w| w.default_load as f64).sum();
    let total_overall: f64 = workers.iter().map(|w| w.overall_load as f64).sum();
    let average_job_pages = total_pages as f64 / count;
    let average_overall = total_overall / count;

    let mut loads: Vec<WorkerLoad> = workers
        .iter()
        .map(|worker| {
            let default_part = if total_default > 0.0 {
                worker.default_load as f64 / total_default
            } else {
                1.0 / count
            };
            let overall_part = overall_load_fraction(
                worker.overall_load as f64,
                average_overall,
                average_job_pages,
                total_overall,
            );
            WorkerLoad {
                user_id: worker.user_id,
                share_load: default_part * overall_part,
                pages_number: 0,
            }
        })
        .collect();

    normalize_shares(&mut loads);

    let required = (total_pages * coverage.max(1) as u64) as i64;
    let cap = total_pages as i64;
    for load in loads.iter_mut() {
        let target = (required as f64 * load.share_load).round() as i64;
        load.pages_number = target.min(cap);
    }
    sort_by_target(&mut loads);

    let assigned: i64 = loads.iter().map(|l| l.pages_number).sum();
    let leftover = redistribute_leftover(&mut loads, required - assigned, cap);
    settle_discrepancy(&mut loads, leftover);
    sort_by_target(&mut loads);

    debug!(
        "负载计算完成: 总页数 {}, 覆盖次数 {}, 人员数 {}",
        total_pages,
        coverage,
        loads.len()
    );
    loads
}

fn overall_load_fraction(
    overall_load: f64,
    average_overall: f64,
    average_job_pages: f64,
    total_overall: f64,
) -> f64 {
    if total_overall == 0.0 || average_job_pages == 0.0 {
        return 1.0;
    }
    let deviation = (average_overall - overall_load).max(-average_job_pages);
    (average_job_pages + deviation) / average_job_pages
}

fn normalize_shares(loads: &mut [WorkerLoad]) {
    let sum: f64 = loads.iter().map(|l| l.share_load).sum();
    let count = loads.len() as f64;
    for load in loads.iter_mut() {
        load.share_load = if sum > 0.0 {
            load.share_load / sum
        } else {
            1.0 / count
        };
    }
}

fn sort_by_target(loads: &mut [WorkerLoad]) {
    loads.sort_by(|a, b| {
        b.pages_number.cmp(&a.pages_number).then_with(|| {
            b.share_load
                .partial_cmp(&a.share_load)
                .unwrap_or(Ordering::Equal)
        })
    });
}

/// 逐个人员按份额发放取整后剩余的页，每次至少1页，不超过人员距总页数的空间
fn redistribute_leftover(loads: &mut [WorkerLoad], mut leftover: i64, cap: i64) -> i64 {
    while leftover > 0 {
        let snapshot = leftover as f64;
        let mut granted = false;

        for load in loads.iter_mut() {
            if leftover == 0 {
                break;
            }
            let room = cap - load.pages_number;
            if room <= 0 {
                continue;
            }
            let grant = ((snapshot * load.share_load).round() as i64)
                .max(1)
                .min(room)
                .min(leftover);
            load.pages_number += grant;
            leftover -= grant;
            granted = true;
        }

        if !granted {
            break;
        }
    }
    leftover
}

/// 把最后的取整误差记到负载最高的人员上
///
/// 多余的页从负载最高者（并列时份额较小者）扣除，单人扣到0后继续扣下一位。
fn settle_discrepancy(loads: &mut [WorkerLoad], leftover: i64) {
    if leftover > 0 {
        if let Some(first) = loads.first_mut() {
            first.pages_number += leftover;
        }
        return;
    }

    let mut deficit = -leftover;
    while deficit > 0 {
        let mut target: Option<usize> = None;
        for (index, load) in loads.iter().enumerate() {
            if load.pages_number <= 0 {
                continue;
            }
            let better = match target {
                None => true,
                Some(current) => {
                    let best = &loads[current];
                    load.pages_number > best.pages_number
                        || (load.pages_number == best.pages_number
                            && load.share_load < best.share_load)
                }
            };
            if better {
                target = Some(index);
            }
        }

        let Some(index) = target else {
            break;
        };
        let taken = deficit.min(loads[index].pages_number);
        loads[index].pages_number -= taken;
        deficit -= taken;
    }
}
