/// 起動されるプログラムの特権レベル
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RunLevel {
    /// 最小特権（呼び出し元と同じ、昇格なし）
    #[default]
    Lowest,
    /// 最上位特権
    Highest,
}

impl RunLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lowest => "Lowest",
            Self::Highest => "Highest",
        }
    }
}
