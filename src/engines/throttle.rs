// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// 请求节流器
///
/// 保证经过同一个节流器的相邻请求之间至少间隔 `delay`。
/// 锁在等待期间保持，后续请求因此依次排队。
#[derive(Clone)]
pub struct Throttle {
    last_request_time: Arc<Mutex<Option<Instant>>>,
    delay: Duration,
}

impl Throttle {
    pub fn new(delay: Duration) -> Self {
        Self {
            last_request_time: Arc::new(Mutex::new(None)),
            delay,
        }
    }

    pub async fn wait_before_request(&self) {
        let mut last = self.last_request_time.lock().await;
        if let Some(last_time) = *last {
            let elapsed = last_time.elapsed();
            if elapsed < self.delay {
                tokio::time::sleep(self.delay - elapsed).await;
            }
        }
        *last = Some(Instant::now());
    }
}
