use clap::{Parser, Subcommand};
use phishguard_common::GenerationMode;

#[derive(Parser)]
#[command(name = "phishguard")]
#[command(about = "AIによるフィッシングURL解析ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Geminiモデル名（設定ファイルより優先）
    #[arg(long, global = true)]
    pub model: Option<String>,

    /// 生成モード (structured/search)
    #[arg(long, global = true)]
    pub mode: Option<GenerationMode>,

    /// タイムアウト秒数
    #[arg(long, global = true)]
    pub timeout: Option<u64>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// URLを1件解析
    Analyze {
        /// 解析するURL（http:// または https://）
        #[arg(required = true)]
        url: String,

        /// 結果をJSONで出力
        #[arg(long)]
        json: bool,
    },

    /// 対話的にURLを入力して解析
    Interactive,

    /// サンプルURLを表示
    Examples,

    /// 設定を表示/編集
    Config {
        /// 設定を表示
        #[arg(long)]
        show: bool,

        /// 既定モデルを設定
        #[arg(long)]
        set_model: Option<String>,

        /// 既定の生成モードを設定
        #[arg(long)]
        set_mode: Option<GenerationMode>,

        /// 既定のタイムアウト秒数を設定
        #[arg(long)]
        set_timeout: Option<u64>,
    },
}
