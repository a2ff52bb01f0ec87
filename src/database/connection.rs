use log::error;
use openssl::ssl::{SslConnector, SslMethod, SslVerifyMode};
use postgres_openssl::MakeTlsConnector;
use tokio::time::Duration;
use url::Url;

const MAX_RETRIES: usize = 3;
const WAIT_BETWEEN_RETRIES: u64 = 2;

pub fn create_ssl_connector(sslrootcert_path: &str) -> Result<MakeTlsConnector, String> {
    let mut builder =
        SslConnector::builder(SslMethod::tls()).map_err(|e| format!("SSL builder error: {}", e))?;

    builder
        .set_ca_file(sslrootcert_path)
        .map_err(|e| format!("Error loading CA cert: {}", e))?;

    builder.set_verify(SslVerifyMode::NONE); // TEMPORARY FOR SELF-SIGNED CERTS

    Ok(MakeTlsConnector::new(builder.build()))
}

/// Split the `sslrootcert` query parameter off the database URL
///
/// tokio-postgres does not understand the parameter, so it is stripped
/// from the connection string and handed to the SSL connector instead.
fn split_sslrootcert(database_url: &str) -> Result<(String, String), String> {
    let url = Url::parse(database_url).map_err(|e| format!("URL parse error: {}", e))?;

    let mut sslrootcert_path = None;
    let mut clean_params = Vec::new();
    for (key, value) in url.query_pairs() {
        if key == "sslrootcert" {
            sslrootcert_path = Some(value.to_string());
        } else {
            clean_params.push(format!("{}={}", key, value));
        }
    }

    let sslrootcert_path = sslrootcert_path.ok_or("sslrootcert parameter missing")?;

    let mut clean_url = url;
    clean_url.set_query(None);
    if !clean_params.is_empty() {
        clean_url.set_query(Some(&clean_params.join("&")));
    }

    Ok((clean_url.to_string(), sslrootcert_path))
}

/// Run a database operation, reconnecting on transient failures
///
/// The reply to a node must not wait on a dead database for long, so the
/// retry count is low; a packet whose archive write keeps failing gets
/// logged and dropped by the caller.
pub async fn execute_with_retry<F, Fut, T>(database_url: &str, operation: F) -> Result<T, String>
where
    F: Fn(tokio_postgres::Client) -> Fut + Send + Sync,
    Fut: std::future::Future<Output = Result<T, tokio_postgres::Error>> + Send,
{
    let (clean_database_url, sslrootcert_path) = split_sslrootcert(database_url)?;

    for attempt in 0..MAX_RETRIES {
        if attempt > 0 {
            tokio::time::sleep(Duration::from_secs(WAIT_BETWEEN_RETRIES)).await;
        }

        let connector = match create_ssl_connector(&sslrootcert_path) {
            Ok(c) => c,
            Err(e) => {
                error!("Attempt {}: SSL connector error: {}", attempt + 1, e);
                continue;
            }
        };

        match tokio_postgres::connect(&clean_database_url, connector).await {
            Ok((client, connection)) => {
                tokio::spawn(async move {
                    if let Err(e) = connection.await {
                        error!("Connection error: {}", e);
                    }
                });

                match operation(client).await {
                    Ok(result) => return Ok(result),
                    Err(e) => error!("Query error: {}", e),
                }
            }
            Err(e) => error!("Connection error: {}", e),
        }
    }

    Err("Max retries exceeded".into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_sslrootcert_and_keeps_other_params() {
        let (clean, cert) = split_sslrootcert(
            "postgres://user:pw@db.example:5432/ttt?sslmode=require&sslrootcert=/etc/certs/ca.pem",
        )
        .unwrap();
        assert_eq!(cert, "/etc/certs/ca.pem");
        assert_eq!(clean, "postgres://user:pw@db.example:5432/ttt?sslmode=require");
    }

    #[test]
    fn missing_sslrootcert_is_an_error() {
        assert!(split_sslrootcert("postgres://user:pw@db.example/ttt").is_err());
    }

    // A CA file that does not exist fails every attempt inside
    // create_ssl_connector, before any network traffic
    #[tokio::test]
    async fn waits_between_attempts_when_connector_fails() {
        let start = std::time::Instant::now();
        let result: Result<(), String> = execute_with_retry(
            "postgres://user:pw@localhost/ttt?sslrootcert=/nonexistent/ca.pem",
            |_client| async move { Ok(()) },
        )
        .await;
        assert!(result.is_err());
        assert!(start.elapsed() >= Duration::from_secs((MAX_RETRIES as u64 - 1) * WAIT_BETWEEN_RETRIES));
    }
}
