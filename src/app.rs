use crate::cli::Command;
use crate::clients::{PersonaApi, PersonaClient};
use crate::config::Config;
use crate::error::AppError;
use crate::services::{InterviewSession, PersonaDirectory, UsageMonitor};
use crate::ui::{render, TerminalPresenter};
use crate::workflow::{BulkRunController, RunOutcome};
use anyhow::{bail, Result};
use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

/// 应用主结构
pub struct App {
    config: Config,
    client: PersonaClient,
    directory: PersonaDirectory<PersonaClient>,
}

impl App {
    /// 初始化应用
    pub fn initialize(config: Config) -> Result<Self> {
        log_startup(&config);

        let client = PersonaClient::new(&config)?;
        let directory = PersonaDirectory::new(client.clone());

        Ok(Self {
            config,
            client,
            directory,
        })
    }

    /// 执行一条子命令
    pub async fn run(&mut self, command: Command) -> Result<()> {
        match command {
            Command::Prefectures => self.prefectures().await,
            Command::Personas { prefecture, region } => {
                self.personas(prefecture.as_deref(), region.as_deref()).await
            }
            Command::Show { id } => self.show(&id).await,
            Command::Profile { id, enhance } => self.profile(&id, enhance).await,
            Command::Usage { watch } => self.usage(watch).await,
            Command::Interview { id } => self.interview(&id).await,
            Command::Bulk {
                question,
                prefecture,
                grep,
                region,
            } => {
                self.bulk(
                    &question,
                    prefecture.as_deref(),
                    grep.as_deref(),
                    region.as_deref(),
                )
                .await
            }
        }
    }

    async fn prefectures(&self) -> Result<()> {
        let summary = self.client.list_prefectures().await?;
        println!("{}", render::prefecture_table(&summary));
        Ok(())
    }

    async fn personas(&mut self, prefecture: Option<&str>, region: Option<&str>) -> Result<()> {
        let (title, list) = match region {
            Some(region) => (region.to_string(), self.directory.region(region).await?),
            None => {
                let title = prefecture.unwrap_or("全国").to_string();
                (title, self.directory.personas(prefecture).await?.clone())
            }
        };

        println!("{}のペルソナ（{}人）", title, list.personas.len());
        for persona in &list.personas {
            println!("{}", render::persona_card(persona));
        }
        Ok(())
    }

    async fn show(&self, id: &str) -> Result<()> {
        let persona = self.directory.persona(id).await?;
        println!("{}", render::persona_detail(&persona));
        Ok(())
    }

    async fn profile(&mut self, id: &str, enhance: bool) -> Result<()> {
        let (profile, narrative) = if enhance {
            info!("✨ 生成自我介绍: {}", id);
            let enhanced = self.client.enhance_profile(id).await?;
            (enhanced.profile, Some(enhanced.narrative))
        } else {
            (self.directory.profile(id).await?.clone(), None)
        };

        if let Some(narrative) = narrative.filter(|n| !n.trim().is_empty()) {
            println!("📝 自己紹介\n{}\n", narrative.trim());
        }
        println!("📖 経歴\n{}\n", render::lifelog(&profile.lifelog));
        println!("🧠 心理\n{}", render::psych(&profile.psych));
        Ok(())
    }

    async fn usage(&self, watch: bool) -> Result<()> {
        if !watch {
            let usage = self.client.usage().await?;
            println!("{}", render::usage(&usage));
            return Ok(());
        }

        let monitor = UsageMonitor::spawn(
            Arc::new(self.client.clone()),
            self.config.usage_poll_interval(),
        );
        let mut updates = monitor.subscribe();
        loop {
            tokio::select! {
                changed = updates.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    if let Some(usage) = updates.borrow_and_update().clone() {
                        println!("{}", render::usage(&usage));
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    info!("停止用量监视");
                    break;
                }
            }
        }
        Ok(())
    }

    async fn interview(&self, id: &str) -> Result<()> {
        let mut session = InterviewSession::new(id)?;

        match self.directory.persona(session.persona_id()).await {
            Ok(persona) => println!(
                "{} {}とのインタビュー（終了: exit）",
                render::gender_emoji(&persona.gender),
                persona.display_name()
            ),
            Err(e) => warn!("⚠️ 角色信息获取失败，继续访谈: {}", e),
        }

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            print!("> ");
            std::io::stdout().flush().map_err(AppError::Io)?;

            let Some(line) = lines.next_line().await.map_err(AppError::Io)? else {
                break;
            };
            let message = line.trim();
            if message.is_empty() {
                continue;
            }
            if message == "exit" || message == "quit" {
                break;
            }

            match session.ask(&self.client, message).await {
                Ok(answer) => println!("💬 {}\n", answer),
                Err(e) => println!("（エラーが発生しました: {}）\n", e),
            }
        }

        info!("访谈结束，共 {} 轮", session.history().len() / 2);
        Ok(())
    }

    async fn bulk(
        &self,
        question: &str,
        prefecture: Option<&str>,
        grep: Option<&str>,
        region: Option<&str>,
    ) -> Result<()> {
        let prefecture = prefecture.filter(|p| !p.trim().is_empty());

        match self.client.list_prefectures().await {
            Ok(summary) => {
                let count = match prefecture {
                    Some(p) => summary.count_for(p),
                    None => summary.total(),
                };
                println!(
                    "{}",
                    render::estimate_label(count, prefecture.is_none(), self.config.rpm_limit)
                );
            }
            Err(e) => warn!("⚠️ 都道府县列表获取失败，跳过所需时间估算: {}", e),
        }

        let controller =
            BulkRunController::new(self.client.clone()).with_rpm_limit(self.config.rpm_limit);
        let mut presenter = TerminalPresenter::new(std::io::stdout());

        let outcome = controller.start_run(question, prefecture, &mut presenter).await?;

        if grep.is_some() || region.is_some() {
            let state = controller.state();
            let matched = state.filter_results(grep.unwrap_or_default(), region);
            println!("\n🔍 絞り込み結果: {}件", matched.len());
            for item in matched {
                println!("{}", render::result_card(item));
            }
        }

        match outcome {
            RunOutcome::Failed { error, .. } => bail!(error),
            RunOutcome::AlreadyRunning | RunOutcome::Completed(_) => Ok(()),
        }
    }
}

// ========== 日志辅助函数 ==========

fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 ペルソナ・ダッシュボード");
    info!("🌐 服务地址: {}", config.api_base_url);
    info!("📊 RPM 上限: {}", config.rpm_limit);
    info!("{}", "=".repeat(60));
}
