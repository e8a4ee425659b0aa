//! 命令行参数

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "persona-dashboard", version, about = "合成ペルソナ・ダッシュボード（端末版）")]
pub struct Cli {
    /// 角色服务的基础 URL（覆盖配置文件和环境变量）
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// 输出 debug 日志
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// 都道府县一览及角色数
    Prefectures,

    /// 角色列表
    Personas {
        #[arg(long)]
        prefecture: Option<String>,
        #[arg(long, conflicts_with = "prefecture")]
        region: Option<String>,
    },

    /// 角色详细资料
    Show { id: String },

    /// 经历与心理画像
    Profile {
        id: String,
        /// 使用服务端 LLM 生成自我介绍（消耗配额）
        #[arg(long)]
        enhance: bool,
    },

    /// API 用量
    Usage {
        /// 持续刷新，直到 Ctrl+C
        #[arg(long)]
        watch: bool,
    },

    /// 与一个角色对话（从标准输入逐行读取问题）
    Interview { id: String },

    /// 向多个角色一起提问
    Bulk {
        question: String,
        #[arg(long)]
        prefecture: Option<String>,
        /// 结束后按关键词筛选回答
        #[arg(long)]
        grep: Option<String>,
        /// 结束后按地区筛选回答
        #[arg(long)]
        region: Option<String>,
    },
}
