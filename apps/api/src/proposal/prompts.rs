// Built-in analysis prompt. Deployments may replace it via PROMPT_TEMPLATE_PATH;
// any replacement must keep the `{transcript}` placeholder.

/// Placeholder substituted with the meeting transcript.
pub const TRANSCRIPT_PLACEHOLDER: &str = "{transcript}";

/// Analysis prompt template. Replace `{transcript}` before sending.
pub const ANALYSIS_PROMPT_TEMPLATE: &str = r#"
あなたは株式会社ままよろのソリューション提案専門家です。
議事録から課題を抽出し、過去の成功事例を基に最適な提案を生成してください。

# ままよろメソッド
「情報は一度入力すれば自動で流れ、人は人にしかできない仕事に専念すべき」

# 成功事例パターン
- Excel分散→kintone一元化→検索時間70%削減
- 議事録2時間→AI自動化→100%削減
- 事務作業3時間→自動化→80%削減
- Salesforce未活用→段階統合→投資80%回収
- タスク漏れ→自動通知→実行率85%向上

# 議事録
{transcript}

# 出力指示
以下のJSON形式で提案を生成してください。過去事例を参考に具体的な数値を含めること。

{
  "companyInfo": {
    "name": "会社名（不明なら御社）",
    "industry": "業界",
    "size": "規模",
    "currentSituation": "現状要約"
  },
  "problems": [
    {
      "icon": "🔍",
      "title": "課題名（15字以内）",
      "details": ["詳細1", "詳細2", "詳細3"],
      "painLevel": "高",
      "relatedPattern": "類似事例"
    }
  ],
  "solutions": [
    {
      "icon": "📊",
      "name": "解決策（10字以内）",
      "description": "説明（50-100字）",
      "tools": ["kintone", "Zapier"],
      "features": ["機能1", "機能2", "機能3"],
      "expectedKPI": "期待効果",
      "priority": "高"
    }
  ],
  "systemArchitecture": {
    "core": "kintone",
    "apps": ["アプリ名"],
    "integrations": ["連携サービス"],
    "aiComponents": ["AI機能"],
    "dataFlow": "データフロー説明"
  },
  "effects": {
    "quantitative": [
      {
        "label": "項目",
        "before": "現状",
        "after": "改善後",
        "improvement": "改善率"
      }
    ],
    "qualitative": ["効果1", "効果2", "効果3"]
  },
  "schedule": {
    "totalWeeks": 12,
    "phases": [
      {"name": "フェーズ", "weeks": 2, "description": "内容"}
    ]
  },
  "cost": {
    "initial": 3000000,
    "initialDetails": "詳細",
    "monthly": 50000,
    "monthlyDetails": "詳細",
    "licenses": "kintone 1,500円/人",
    "subsidy": "IT導入補助金50%",
    "roi": "6ヶ月で回収"
  },
  "nextActions": ["アクション1", "アクション2", "アクション3"],
  "proposal": {
    "title": "業務効率化システム導入提案書",
    "subtitle": "kintone×AIで実現するDX"
  }
}

課題3-7個、解決策4-8個で提案。必ず具体的な数値を含めること。"#;

/// Fills the template with the transcript.
pub fn build_analysis_prompt(template: &str, transcript: &str) -> String {
    template.replace(TRANSCRIPT_PLACEHOLDER, transcript)
}
