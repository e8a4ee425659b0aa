//! 流式消费层
//!
//! 把一括提问的响应体（字节分片流）转换为惰性的、只能前进一次的记录流。
//! 上游错误作为最后一项交给调用方，之后流结束。

pub mod decoder;

pub use decoder::{parse_line, LineDecoder, DATA_PREFIX};

use crate::error::AppResult;
use crate::models::StreamRecord;
use futures::stream::{self, BoxStream, Stream, StreamExt};
use std::collections::VecDeque;

/// 一括提问的记录流
pub type RecordStream = BoxStream<'static, AppResult<StreamRecord>>;

struct DecodeState<S> {
    body: S,
    decoder: LineDecoder,
    ready: VecDeque<StreamRecord>,
}

/// 将字节分片流解码为记录流
///
/// - 记录按到达顺序产出
/// - 上游的 `Err` 原样产出，然后流结束
/// - 上游结束时，缓冲区中没有换行结尾的最后一段也会被解析
pub fn decode_records<S, B>(body: S) -> RecordStream
where
    S: Stream<Item = AppResult<B>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
{
    let state = DecodeState {
        body: Box::pin(body),
        decoder: LineDecoder::new(),
        ready: VecDeque::new(),
    };

    stream::unfold(Some(state), |state| async move {
        let mut state = state?;
        loop {
            if let Some(record) = state.ready.pop_front() {
                return Some((Ok(record), Some(state)));
            }
            match state.body.next().await {
                Some(Ok(chunk)) => {
                    let records = state.decoder.push(chunk.as_ref());
                    state.ready.extend(records);
                }
                Some(Err(e)) => return Some((Err(e), None)),
                None => return state.decoder.finish().map(|record| (Ok(record), None)),
            }
        }
    })
    .boxed()
}
