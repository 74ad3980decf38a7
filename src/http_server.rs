use anyhow::{Context, Result};
use esp_idf_svc::{
    http::{
        server::{Configuration, EspHttpServer},
        Headers, Method,
    },
    io::{Read, Write},
};
use led_strip_server::{
    driver::StripDriver,
    handler::{checked_body_len, handle_set, INDEX_HTML, JSON_CONTENT_TYPE},
    strip::SharedLedStrip,
};
use log::info;

pub fn start_http_server<D>(port: u16, strip: SharedLedStrip<D>) -> Result<EspHttpServer<'static>>
where
    D: StripDriver + Send + 'static,
{
    let mut server = EspHttpServer::new(&Configuration {
        http_port: port,
        ..Default::default()
    })
    .context("Failed to start http server")?;

    server.fn_handler::<anyhow::Error, _>("/", Method::Get, |req| {
        req.into_response(200, None, &[("Content-Type", "text/html; charset=utf-8")])?
            .write_all(INDEX_HTML.as_bytes())?;
        Ok(())
    })?;

    server.fn_handler::<anyhow::Error, _>("/set", Method::Post, move |mut req| {
        let reply = match checked_body_len(req.content_len()) {
            Ok(len) => {
                let mut body = vec![0; len];
                req.read_exact(&mut body)
                    .map_err(|e| anyhow::anyhow!("Failed to read request body: {e:?}"))?;
                handle_set(&strip, &body)
            }
            Err(rejected) => rejected,
        };

        req.into_response(reply.status, None, &[("Content-Type", JSON_CONTENT_TYPE)])?
            .write_all(&reply.body)?;
        Ok(())
    })?;

    info!("HTTP server listening on port {port}");

    Ok(server)
}
