use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use std::time::Instant;

use clap::{Arg, ArgAction, Command};
use utils_common::{to_compressed, PostMetadata, INDEX_VERSION};

mod scan;

use scan::{scan_posts, IndexError};

/// 紧凑索引的文件名，写在 JSON 索引旁边
const COMPACT_INDEX_NAME: &str = "index.bin";

/// 索引生成参数
struct IndexerOptions {
    source: PathBuf,
    output: PathBuf,
    prefix: String,
    compact: bool,
    verbose: bool,
}

fn main() {
    let matches = Command::new("post-indexer")
        .version(env!("CARGO_PKG_VERSION"))
        .about("扫描文章 HTML 文件，生成文章列表页使用的元数据索引")
        .arg(
            Arg::new("source")
                .short('s')
                .long("source")
                .value_name("SOURCE_DIR")
                .help("文章 HTML 所在目录")
                .required(true),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("OUTPUT_FILE")
                .help("索引输出路径，默认为 <SOURCE_DIR>/index.json"),
        )
        .arg(
            Arg::new("prefix")
                .short('p')
                .long("prefix")
                .value_name("URL_PREFIX")
                .help("写入 file 字段时加在相对路径前的目录")
                .default_value("posts"),
        )
        .arg(
            Arg::new("compact")
                .short('c')
                .long("compact")
                .help("同时生成压缩的二进制索引 index.bin")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("显示详细信息")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    let source = PathBuf::from(matches.get_one::<String>("source").cloned().unwrap_or_default());
    let output = matches
        .get_one::<String>("output")
        .map(PathBuf::from)
        .unwrap_or_else(|| source.join("index.json"));

    let options = IndexerOptions {
        source,
        output,
        prefix: matches.get_one::<String>("prefix").cloned().unwrap_or_default(),
        compact: matches.get_flag("compact"),
        verbose: matches.get_flag("verbose"),
    };

    println!("开始生成索引...");
    println!("源目录: {}", options.source.display());
    println!("输出文件: {}", options.output.display());

    if let Err(e) = generate_index(&options) {
        eprintln!("错误: 索引生成失败: {}", e);
        process::exit(1);
    }
}

fn generate_index(options: &IndexerOptions) -> Result<(), IndexError> {
    let start_time = Instant::now();

    let report = scan_posts(&options.source, &options.prefix, options.verbose)?;
    println!(
        "扫描完成。找到 {} 篇文章，跳过 {} 个文件。",
        report.posts.len(),
        report.skipped
    );

    let mut posts = report.posts;
    sort_newest_first(&mut posts);

    write_json_index(&options.output, &posts)?;
    println!("JSON 索引已写入: {}", options.output.display());

    if options.compact {
        let compact_path = options.output.with_file_name(COMPACT_INDEX_NAME);
        let data = to_compressed(&posts, INDEX_VERSION)?;
        write_file(&compact_path, &data)?;
        println!("紧凑索引已写入: {}，大小: {} 字节", compact_path.display(), data.len());
    }

    println!("索引生成完成！耗时: {:.2}秒", start_time.elapsed().as_secs_f32());
    Ok(())
}

/// 按开始日期倒序；日期相同时保持扫描顺序
fn sort_newest_first(posts: &mut [PostMetadata]) {
    posts.sort_by(|a, b| b.date.start().cmp(a.date.start()));
}

fn write_json_index(path: &Path, posts: &[PostMetadata]) -> Result<(), IndexError> {
    let json = serde_json::to_vec_pretty(posts)?;
    write_file(path, &json)
}

fn write_file(path: &Path, data: &[u8]) -> Result<(), IndexError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| IndexError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    fs::write(path, data).map_err(|source| IndexError::Io {
        path: path.to_path_buf(),
        source,
    })
}
