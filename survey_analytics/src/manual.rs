/*!

This is the long-form manual for `survey_analytics` and `surveystat`.

## Concepts

A *submission* is one questionnaire filled out by a field worker for one surveyed person. It carries
the profile of that person (name, age, gender, ward, ...) and one or more *survey modules*
(`Survey1`, `Survey2`, ...). Each module holds the answers to its questions.

An answer is either:
* a single value (a choice, or a free text written in one field), or
* a set of labeled sub-answers, for questions that ask for several free texts at once
  (for example the first, second and third priority of a household).

The analysis of a question ranks its distinct answers by how many people gave them. The most
frequent answers (7 by default) get their own bucket, the remaining ones are collapsed into a
single `Other opinions` bucket. Percentages are computed against all the people selected,
including the ones who left the question blank.

## Input formats

The following providers are supported:
* `json` the payload of the submission list (`{"userData": [...]}` or a bare array)
* `csv` a flattened export, one respondent per row
* `xlsx` the same flattened export, in an Excel workbook

### `json`

Each element is one submission:

```text
{
  "_id": "65f0c1",
  "name": "राम",
  "wardNumber": "5",
  "gender": "पुरुष",
  "surveys": [
    {
      "surveyKey": "Survey1",
      "topic": "विकास",
      "subject": "प्राथमिकता",
      "answers": [
        { "questionId": "q1", "questionText": "पहिलो आवश्यकता", "answer": "सडक" },
        { "questionId": "q2", "questionText": "सुझाव", "answer": { "पहिलो": "पुल", "दोस्रो": "" } }
      ]
    }
  ]
}
```

Numbers are accepted wherever a text is expected. A `null` answer is blank, an array answer is
joined with commas.

### `csv` and `xlsx`

The first row holds the column names. Profile columns use the same names as the `json` fields
(`_id`, `name`, `wardNumber`, ...). Answer columns are named after the survey module and the
question:

```text
_id,name,wardNumber,Survey1/q1,Survey1/q2/पहिलो,Survey1/q2/दोस्रो
a1,राम,5,सडक,पुल,
a2,सीता,3,पानी,,धारा
```

`Survey1/q1` is a single-value question, `Survey1/q2` is a multi-part question with two
sub-questions. Columns with any other name are ignored. For `xlsx` files, the worksheet may be
selected with `worksheetName`; otherwise the workbook must contain a single worksheet.

## Configuration

`surveystat` can run from the command line only, or from a configuration file in JSON:

```text
{
  "outputSettings": { "reportName": "Ward priorities", "chartKind": "bar" },
  "dataSources": [ { "provider": "json", "filePath": "submissions.json" } ],
  "usersSource": { "filePath": "users.json" },
  "sessionSource": { "filePath": "session.json" },
  "selection": { "surveyKey": "Survey1", "questionId": "q1", "ward": "5" },
  "rules": { "topAnswers": 5, "maxLabelLength": "30" }
}
```

File paths are relative to the configuration file. `ward` defaults to `all`. The rules accept
numbers or strings and default to 7 top answers and labels of 30 characters.

## Reports

* `question` (default): the distribution of the answers to the selected question
* `catalog`: the survey modules and their questions
* `wards`: the wards present in the data, numeric ones first
* `overview`: the administration figures (requires an administrator session)
* `users`: the registered users, filtered with `--search` (requires an administrator session)

 */
