#[cfg(test)]
mod tests {
    use log::debug;
    use tokio::io::{ AsyncReadExt, AsyncWriteExt };
    use tokio::net::TcpListener;
    use tokio::sync::oneshot;

    use tokio::test;

    use crate::errors::GenerationError;
    use crate::implementations::config::ModelConfig;
    use crate::implementations::openai_generator::OpenAiGenerator;
    use crate::models::prompt::Prompt;
    use crate::traits::proof_generator::ProofGenerator;

    fn setup() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    /// Serve a single HTTP response on a local port.
    ///
    /// Returns the API base URL and a receiver for the raw request text.
    async fn serve_once(status_line: &'static str, body: String) -> (String, oneshot::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = oneshot::channel();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let request = read_request(&mut socket).await;
            let _ = tx.send(request);

            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
        });

        (format!("http://{}/v1/", addr), rx)
    }

    /// Read headers and a `Content-Length` body
    async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
        let mut data = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            data.extend_from_slice(&chunk[..n]);

            let text = String::from_utf8_lossy(&data).to_string();
            if let Some(header_end) = text.find("\r\n\r\n") {
                let content_length = text[..header_end]
                    .lines()
                    .find_map(|line| {
                        let (name, value) = line.split_once(':')?;
                        if name.eq_ignore_ascii_case("content-length") {
                            value.trim().parse::<usize>().ok()
                        } else {
                            None
                        }
                    })
                    .unwrap_or(0);
                if data.len() >= header_end + 4 + content_length {
                    return text;
                }
            }
        }
        String::from_utf8_lossy(&data).to_string()
    }

    fn generator(api_base_url: String, api_key: Option<&str>) -> OpenAiGenerator {
        OpenAiGenerator::new(ModelConfig {
            api_base_url,
            api_key: api_key.map(str::to_string),
            ..ModelConfig::default()
        }).unwrap()
    }

    fn prompt() -> Prompt {
        Prompt {
            system: "You are a helpful assistant that generates Lean 4 code.".to_string(),
            user: "Prove that 1 + 1 = 2.".to_string(),
        }
    }

    #[test]
    async fn test_successful_completion_returns_content() {
        setup();
        let body =
            r#"{"choices":[{"index":0,"message":{"role":"assistant","content":"```lean\nexample : 1 + 1 = 2 := rfl\n```"}}]}"#;
        let (base, request) = serve_once("200 OK", body.to_string()).await;

        let text = generator(base, None).submit(&prompt()).await.unwrap();
        assert_eq!(text, "```lean\nexample : 1 + 1 = 2 := rfl\n```");

        let request = request.await.unwrap();
        debug!("Captured request:\n{}", request);
        let lowered = request.to_lowercase();
        assert!(request.starts_with("POST /v1/chat/completions "));
        assert!(lowered.contains("authorization: bearer ollama"));
        assert!(request.contains("\"model\":\"mistral-small3.2:latest\""));
        assert!(request.contains("Prove that 1 + 1 = 2."));
    }

    #[test]
    async fn test_configured_key_is_sent() {
        setup();
        let body = r#"{"choices":[{"message":{"content":"ok"}}]}"#;
        let (base, request) = serve_once("200 OK", body.to_string()).await;

        generator(base, Some("sk-test")).submit(&prompt()).await.unwrap();

        let request = request.await.unwrap().to_lowercase();
        assert!(request.contains("authorization: bearer sk-test"));
    }

    #[test]
    async fn test_unauthorized_status_is_an_authentication_error() {
        setup();
        let (base, _request) = serve_once(
            "401 Unauthorized",
            r#"{"error":{"message":"invalid api key"}}"#.to_string()
        ).await;

        let err = generator(base, Some("wrong")).submit(&prompt()).await.unwrap_err();
        match err {
            GenerationError::Unauthorized { status, message } => {
                assert_eq!(status, 401);
                assert!(message.contains("invalid api key"));
            }
            other => panic!("expected Unauthorized, got {:?}", other),
        }
    }

    #[test]
    async fn test_server_error_status_is_an_http_error() {
        setup();
        let (base, _request) = serve_once("503 Service Unavailable", "busy".to_string()).await;

        let err = generator(base, None).submit(&prompt()).await.unwrap_err();
        assert_eq!(err, GenerationError::Http { status: 503, message: "busy".to_string() });
    }

    #[test]
    async fn test_missing_content_is_malformed() {
        setup();
        let (base, _request) = serve_once("200 OK", r#"{"choices":[]}"#.to_string()).await;

        let err = generator(base, None).submit(&prompt()).await.unwrap_err();
        assert!(matches!(err, GenerationError::MalformedResponse(_)));
    }

    #[test]
    async fn test_closed_port_is_unreachable() {
        setup();
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = generator(format!("http://{}/v1", addr), None)
            .submit(&prompt()).await
            .unwrap_err();
        assert!(matches!(err, GenerationError::Unreachable(_)));
    }
}
