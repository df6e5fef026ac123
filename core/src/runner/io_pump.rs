use tokio::io::AsyncReadExt;
use tokio::task::JoinHandle;

use crate::error::RunnerError;

/// Reads `rd` to EOF on its own task and hands back everything it produced.
pub fn pump<R>(mut rd: R, label: &'static str) -> JoinHandle<Result<Vec<u8>, RunnerError>>
where
    R: tokio::io::AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut buf = vec![0u8; 16 * 1024];
        let mut captured = Vec::new();

        loop {
            let n = rd.read(&mut buf).await.map_err(|e| RunnerError::Io {
                stage: label,
                source: e,
            })?;
            if n == 0 {
                break;
            }
            captured.extend_from_slice(&buf[..n]);
        }

        Ok(captured)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncWriteExt;

    #[tokio::test]
    async fn captures_everything_until_eof() {
        let (mut wr, rd) = tokio::io::duplex(8);
        let task = pump(rd, "stdout");

        let payload = "x".repeat(64 * 1024);
        wr.write_all(payload.as_bytes()).await.unwrap();
        drop(wr);

        let got = task.await.unwrap().unwrap();
        assert_eq!(got.len(), payload.len());
    }
}
