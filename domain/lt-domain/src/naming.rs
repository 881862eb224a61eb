//! タスク名サニタイズと実行ファイルキー（stdのみ）

use std::fmt;

/// タスク名に使えない文字（Windows のファイル名禁止文字と同じ集合）
const RESERVED_CHARS: [char; 9] = ['"', '<', '>', '|', ':', '*', '?', '\\', '/'];

/// 予約文字か（制御文字 U+0000..U+001F を含む）
pub fn is_reserved_char(c: char) -> bool {
    (c as u32) < 0x20 || RESERVED_CHARS.contains(&c)
}

/// タスク名の禁止文字を空白へ置き換える。
/// 削除ではなく置換なので、異なる名前が同じ名前に潰れない。
pub fn sanitize(raw_name: &str) -> String {
    raw_name
        .chars()
        .map(|c| if is_reserved_char(c) { ' ' } else { c })
        .collect()
}

/// パスの最終要素（ファイル名）を返す。
/// `\` と `/` を区切り、`:` をドライブ/ボリューム区切りとして扱う。
pub fn file_name(path: &str) -> &str {
    match path.rfind(['\\', '/', ':']) {
        Some(index) => &path[index + 1..],
        None => path,
    }
}

/// 実行ファイルパスから導出した照合キー（ファイル名）
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExecutableKey(String);

impl ExecutableKey {
    /// パスからキーを導出。最終要素が空（区切り文字で終わる等）なら None。
    pub fn from_path(executable_path: &str) -> Option<Self> {
        let name = file_name(executable_path);
        if name.is_empty() {
            return None;
        }
        Some(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// タスクのアクションパスがこのキーを指しているか。
    /// 接尾辞一致に加えてファイル名の完全一致を要求する（"app.exe" と "myapp.exe" を区別）。
    /// 大文字小文字は区別する。
    pub fn matches_path(&self, action_path: &str) -> bool {
        action_path.ends_with(self.as_str()) && file_name(action_path) == self.as_str()
    }
}

impl fmt::Display for ExecutableKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
