/*!

This is the long-form manual for `sociometry` and the `sosiogram` program.

## The survey

Each student of the class answers the questions of the questionnaire by naming classmates. The
questions depend on the school level (`PAUD`, `SD`, `SMP`, `SMA`). To print them:

```bash
sosiogram --level SMP
```

## Input formats

The answers are collected in one table, one row per student:

```text
Nama Siswa,Pilihan 1,Pilihan 2,Pilihan 3
Alice,Bob,Carol,
Bob,Carol,,
Carol,,,
```

- `Nama Siswa` (mandatory): the name of the student who answered. Rows without a name are skipped.
- `Pilihan ...` (any number, in column order): one nominated classmate per cell. Empty cells are
  allowed. Only the first 18 of these columns are read.

Other columns (class, date, ...) are ignored. A nomination that does not match the name of a
student of the table is reported as a warning and otherwise ignored: check the spelling in the
input file when these warnings show up.

The following formats are supported:
* `xlsx` Excel workbook. The first worksheet is used unless a worksheet name is given.
* `csv` Comma Separated Values, with the header in the first row.

When no input type is given, it is inferred from the extension of the file.

## Scores and categories

The score of a student is the number of nominations received. The category follows:

| Score   | Category          |
|---------|-------------------|
| 0       | Isolated          |
| 1 - 2   | Socially Limited  |
| 3 - 5   | Adequately Social |
| 6 - 9   | Popular           |
| 10 and more | Highly Popular |

Students with the same score are listed in the order in which they first appear in the input.

## Outputs

- `--table`: the ranked table (`Nama`, `Skor Popularitas`, `Interpretasi`) in CSV.
- `--report`: the same table in a Word document when the path ends with `.docx`, in a Markdown
  document otherwise.
- `--sociogram`: the sociogram as a PNG image (SVG if the file name ends with `.svg`).
- `--out`: a JSON summary of the results (`stdout` to print it). With `--reference`, the summary is
  compared with a previously saved summary and the program fails if they differ.

The layout of the sociogram is reproducible: the same input and the same `--seed` always produce the
same picture.

## Configuration

All the options may also be given in a JSON configuration file passed with `--config`:

```json
{
  "outputSettings": {
    "className": "Kelas 5A",
    "schoolLevel": "SD",
    "outputDirectory": "hasil",
    "summaryPath": "summary.json",
    "tablePath": "hasil_sosiometri.csv",
    "reportPath": "hasil_sosiometri.docx",
    "sociogramPath": "sosiogram.png"
  },
  "fileSources": [
    {
      "provider": "xlsx",
      "filePath": "jawaban.xlsx",
      "excelWorksheetName": "Form1",
      "nameColumn": "Nama Siswa",
      "choicePrefix": "Pilihan"
    }
  ],
  "layout": { "seed": 42, "iterations": 50 }
}
```

Input paths are relative to the directory of the configuration file. Output paths are relative to
`outputDirectory` if given, or to the directory of the configuration file. Several file sources
are read in order and their rows are put together. Options given on the command line override the
ones of the configuration file.

 */
