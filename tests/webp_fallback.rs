use std::cell::RefCell;
use std::io::{Cursor, Read, Write};
use std::net::TcpListener;
use std::path::Path;
use std::thread;

use copy_gif_host::gif_handler::{
    ClipboardError, ClipboardWriter, FetchConfig, HttpGifFetcher, RequestDispatcher,
};
use copy_gif_host::host::{self, SessionOutcome};
use copy_gif_host::protocol::Response;

const TINY_GIF: &[u8] = b"GIF89a\x01\x00\x01\x00\x80\x00\x00\x00\x00\x00\xff\xff\xff!\xf9\x04\x00\x00\x00\x00\x00,\x00\x00\x00\x00\x01\x00\x01\x00\x00\x02\x02D\x01\x00;";

/// 记录收到的文件内容，代替真实剪贴板。
#[derive(Default)]
struct RecordingClipboard {
    copied: RefCell<Vec<Vec<u8>>>,
}

impl ClipboardWriter for RecordingClipboard {
    async fn write(&self, path: &Path) -> Result<(), ClipboardError> {
        let bytes = std::fs::read(path)?;
        self.copied.borrow_mut().push(bytes);
        Ok(())
    }
}

/// 只为 `/a.webp` 返回 GIF 内容，其余路径一律 404。
fn spawn_webp_only_server(connections: usize) -> (String, thread::JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind test server failed");
    let base = format!("http://{}", listener.local_addr().expect("no local addr"));

    let handle = thread::spawn(move || {
        let mut paths = Vec::new();
        for stream in listener.incoming().take(connections) {
            let Ok(mut stream) = stream else { break };
            let mut buf = [0u8; 4096];
            let n = stream.read(&mut buf).unwrap_or(0);
            let head = String::from_utf8_lossy(&buf[..n]).to_string();
            let path = head
                .split_whitespace()
                .nth(1)
                .unwrap_or_default()
                .to_string();

            let (status, body): (&str, &[u8]) = if path == "/a.webp" {
                ("200 OK", TINY_GIF)
            } else {
                ("404 Not Found", &b"missing"[..])
            };
            let header = format!(
                "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                status,
                body.len()
            );
            let _ = stream.write_all(header.as_bytes());
            let _ = stream.write_all(body);
            let _ = stream.flush();
            paths.push(path);
        }
        paths
    });

    (base, handle)
}

#[tokio::test]
async fn webp_url_falls_back_to_original_after_gif_sibling_fails() {
    let (base, server) = spawn_webp_only_server(2);
    let temp = tempfile::tempdir().expect("create temp dir failed");
    let config = FetchConfig {
        temp_dir: Some(temp.path().to_path_buf()),
        use_system_proxy: false,
        ..FetchConfig::default()
    };
    let dispatcher = RequestDispatcher::new(HttpGifFetcher::new(config), RecordingClipboard::default());

    let request = format!(r#"{{"action":"copyGif","url":"{}/a.webp"}}"#, base);
    let mut input = (request.len() as u32).to_le_bytes().to_vec();
    input.extend_from_slice(request.as_bytes());
    let mut output = Vec::new();

    let outcome = host::serve_one(&mut Cursor::new(input), &mut output, &dispatcher).await;

    assert_eq!(outcome, SessionOutcome::Responded(Response::success()));

    let expected = br#"{"success":true,"method":"native"}"#;
    assert_eq!(&output[..4], &(expected.len() as u32).to_le_bytes());
    assert_eq!(&output[4..], expected);

    let paths = server.join().expect("server thread panicked");
    assert_eq!(paths, vec!["/a.gif".to_string(), "/a.webp".to_string()]);

    assert_eq!(dispatcher_copied(&dispatcher), vec![TINY_GIF.to_vec()]);
    assert!(
        std::fs::read_dir(temp.path())
            .expect("read temp dir failed")
            .next()
            .is_none(),
        "temporary artifact left behind"
    );
}

fn dispatcher_copied(
    dispatcher: &RequestDispatcher<HttpGifFetcher, RecordingClipboard>,
) -> Vec<Vec<u8>> {
    dispatcher.writer().copied.borrow().clone()
}
