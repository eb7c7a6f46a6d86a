use clap::Parser;
use pantry_vision::{analyzer, cli, config, error, logging, scanner, server, vision};
use cli::{Cli, Commands};
use config::Config;
use error::{PantryVisionError, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use vision::AzureVisionClient;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?;
    logging::init_logging(&config.log_level, cli.verbose);

    match cli.command {
        Commands::Serve { addr } => {
            let addr_str = addr.unwrap_or_else(|| config.listen_addr.clone());
            let addr: SocketAddr = addr_str.parse().map_err(|e| {
                PantryVisionError::Config(format!("待ち受けアドレスが不正です: {} ({})", addr_str, e))
            })?;

            // 接続情報がなければ起動しない
            let client = AzureVisionClient::from_config(&config)?;
            let state = server::AppState::new(Arc::new(client));

            server::serve(addr, state, config.max_upload_bytes).await?;
        }

        Commands::Analyze { path, output, use_cache } => {
            // 標準出力はJSON用に空けておく
            eprintln!("🥫 pantry-vision - 画像解析\n");

            eprintln!("[1/3] 画像をスキャン中...");
            let images = scanner::scan_path(&path)?;
            eprintln!("✔ {}枚の画像を検出\n", images.len());

            if images.is_empty() {
                return Err(PantryVisionError::NoImagesFound(path.display().to_string()));
            }

            let client = AzureVisionClient::from_config(&config)?;
            let cache_dir = analyzer::cache_folder(&path);
            let mut cache = use_cache.then(|| analyzer::CacheFile::load(&cache_dir));

            eprintln!("[2/3] AI解析中...{}", if use_cache { " (キャッシュ有効)" } else { "" });
            let reports = analyzer::analyze_images(&images, &client, cache.as_mut()).await;
            let failed = reports.iter().filter(|r| !r.response.success).count();
            eprintln!("✔ 解析完了（失敗: {}枚）\n", failed);

            if let Some(cache) = &cache {
                cache.save(&cache_dir)?;
            }

            eprintln!("[3/3] 結果を出力中...");
            let json = serde_json::to_string_pretty(&reports)?;
            match output {
                Some(output) => {
                    std::fs::write(&output, json)?;
                    eprintln!("✔ 結果を保存: {}", output.display());
                }
                None => println!("{}", json),
            }

            eprintln!("\n✅ 解析完了");
        }

        Commands::Config { set_endpoint, set_key, show } => {
            let mut config = config;

            if let Some(endpoint) = set_endpoint {
                config.set_endpoint(endpoint)?;
                println!("✔ エンドポイントを設定しました");
            }

            if let Some(key) = set_key {
                config.set_key(key)?;
                println!("✔ APIキーを設定しました");
            }

            if show {
                let configured = config.vision_credentials().is_ok();
                println!("設定: {}", Config::config_path()?.display());
                println!("  エンドポイント: {}", config.vision_endpoint.as_deref().unwrap_or("未設定"));
                println!("  APIキー: {}", if config.vision_key.is_some() { "設定済み" } else { "未設定" });
                println!("  接続情報（環境変数込み）: {}", if configured { "OK" } else { "不足" });
                println!("  APIバージョン: {}", config.api_version);
                println!("  言語: {}", config.language);
                println!("  待ち受けアドレス: {}", config.listen_addr);
                println!("  最大アップロードサイズ: {} bytes", config.max_upload_bytes);
                println!("  タイムアウト: {}秒", config.timeout_seconds);
                println!("  ログレベル: {}", config.log_level);
            }
        }

        Commands::Cache { clear, folder, info } => {
            let target = folder.unwrap_or_else(|| std::path::PathBuf::from("."));
            let cache_path = analyzer::CacheFile::cache_path(&target);

            if info || !clear {
                // デフォルトまたは--info: 情報表示
                if cache_path.exists() {
                    let cache = analyzer::CacheFile::load(&target);
                    println!("キャッシュ情報:");
                    println!("  パス: {}", cache_path.display());
                    println!("  件数: {}", cache.len());
                    if let Ok(meta) = std::fs::metadata(&cache_path) {
                        println!("  サイズ: {} bytes", meta.len());
                    }
                } else {
                    println!("キャッシュファイルが存在しません: {}", cache_path.display());
                }
            }

            if clear {
                match analyzer::CacheFile::clear(&target) {
                    Ok(true) => println!("✔ キャッシュを削除しました: {}", cache_path.display()),
                    Ok(false) => println!("キャッシュファイルが存在しません"),
                    Err(e) => println!("キャッシュ削除エラー: {}", e),
                }
            }
        }
    }

    Ok(())
}
